// src/sources/mod.rs
pub mod client;
pub mod models;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::{moea::MoeaExtractor, moj::MojExtractor, LawExtractor};
use crate::utils::error::ExtractError;
use models::ExtractionResult;

// Host part of an http(s) URL, skipping optional userinfo.
static URL_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*https?://(?:[^/?#@]*@)?([^/:?#]+)")
        .expect("Failed to compile URL_HOST_RE")
});

// Host patterns per site, checked in order.
static SOURCE_PATTERNS: Lazy<Vec<(Regex, SourceSite)>> = Lazy::new(|| {
    [
        (r"(?i)(^|\.)moj\.gov\.tw$", SourceSite::Moj),
        (r"(?i)(^|\.)moea\.gov\.tw$", SourceSite::Moea),
    ]
    .into_iter()
    .filter_map(|(pat, site)| Regex::new(pat).ok().map(|re| (re, site)))
    .collect()
});

/// Government law databases with a known page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSite {
    /// Laws & Regulations Database (law.moj.gov.tw)
    Moj,
    /// Ministry of Economic Affairs regulation site (law.moea.gov.tw)
    Moea,
}

impl SourceSite {
    /// Picks the site layout for a URL by its host name.
    pub fn from_url(url: &str) -> Result<Self, ExtractError> {
        let host = URL_HOST_RE
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ExtractError::UnsupportedSource(url.to_string()))?;

        SOURCE_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(host))
            .map(|(_, site)| *site)
            .ok_or_else(|| ExtractError::UnsupportedSource(url.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceSite::Moj => "moj",
            SourceSite::Moea => "moea",
        }
    }

    /// Runs the extractor that understands this site's markup.
    pub fn extract(&self, html: &str) -> Result<ExtractionResult, ExtractError> {
        match self {
            SourceSite::Moj => MojExtractor::new().extract(html),
            SourceSite::Moea => MoeaExtractor::new().extract(html),
        }
    }
}
