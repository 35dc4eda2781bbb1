// src/storage/mod.rs
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::pipeline::{Outcome, UrlOutcome};
use crate::render::RenderedDocument;
use crate::utils::error::StorageError;

pub const DEFAULT_ARCHIVE_NAME: &str = "laws_export.zip";
const MANIFEST_NAME: &str = "manifest.json";

// Characters that Windows or POSIX refuse in file names.
static ILLEGAL_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("Failed to compile ILLEGAL_FILENAME_CHARS")
});

/// How rendered documents are handed to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PackMode {
    /// Everything in one zip archive.
    #[default]
    Zip,
    /// One file per document.
    Individual,
}

/// A named byte blob ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Replaces characters that are illegal in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned = ILLEGAL_FILENAME_CHARS.replace_all(name.trim(), "_").to_string();
    if cleaned.is_empty() { "_".to_string() } else { cleaned }
}

/// Makes every name distinct by inserting " (2)", " (3)", ... before the
/// extension of repeats. Order is kept and first occurrences stay as they
/// are. Comparison ignores case so the result also holds on case-insensitive
/// file systems.
pub fn unique_file_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.into_iter().collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        let candidate = if taken.contains(&name.to_lowercase()) {
            let (stem, ext) = match name.rfind('.') {
                Some(dot) if dot > 0 => name.split_at(dot),
                _ => (name, ""),
            };
            (2..)
                .map(|n| format!("{} ({}){}", stem, n, ext))
                .find(|c| !taken.contains(&c.to_lowercase()))
                .unwrap_or_else(|| name.to_string())
        } else {
            name.to_string()
        };
        if candidate != name {
            tracing::warn!("Duplicate file name '{}', delivering as '{}'", name, candidate);
        }
        taken.insert(candidate.to_lowercase());
        unique.push(candidate);
    }
    unique
}

/// Bundles documents into one zip archive, one entry per document in order.
pub fn pack_zip(documents: &[RenderedDocument]) -> Result<Vec<u8>, StorageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for doc in documents {
        zip.start_file(doc.filename.as_str(), options)?;
        zip.write_all(doc.html.as_bytes())?;
        tracing::debug!("Added {} ({} bytes) to archive", doc.filename, doc.html.len());
    }

    Ok(zip.finish()?.into_inner())
}

/// Packs documents into the blobs to deliver for the chosen mode.
pub fn pack(documents: &[RenderedDocument], mode: PackMode, archive_name: &str) -> Result<Vec<Blob>, StorageError> {
    match mode {
        PackMode::Zip => Ok(vec![Blob { name: archive_name.to_string(), bytes: pack_zip(documents)? }]),
        PackMode::Individual => Ok(documents
            .iter()
            .map(|doc| Blob { name: doc.filename.clone(), bytes: doc.html.clone().into_bytes() })
            .collect()),
    }
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    url: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ManifestEntry<'a> {
    fn from_outcome(outcome: &'a UrlOutcome) -> Self {
        match &outcome.outcome {
            Outcome::Success(result) => Self {
                url: &outcome.url,
                status: "success",
                title: Some(&result.title),
                records: Some(result.records.len()),
                date_label: Some(result.date_label.as_str()),
                date_value: Some(&result.date_value),
                error: None,
            },
            Outcome::Failure(err) => Self {
                url: &outcome.url,
                status: "failure",
                title: None,
                records: None,
                date_label: None,
                date_value: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes each blob under a file-system safe version of its name.
    pub fn save_blobs(&self, blobs: &[Blob]) -> Result<Vec<PathBuf>, StorageError> {
        blobs
            .iter()
            .map(|blob| {
                let file_path = self.base_dir.join(sanitize_file_name(&blob.name));
                fs::write(&file_path, &blob.bytes).map_err(StorageError::IoError)?;
                tracing::info!("Saved {} ({} bytes)", file_path.display(), blob.bytes.len());
                Ok(file_path)
            })
            .collect()
    }

    /// Packs and writes documents, returning the written paths in order.
    pub fn deliver(&self, documents: &[RenderedDocument], mode: PackMode, archive_name: &str) -> Result<Vec<PathBuf>, StorageError> {
        let sanitized: Vec<String> = documents.iter().map(|doc| sanitize_file_name(&doc.filename)).collect();
        let safe_documents: Vec<RenderedDocument> = unique_file_names(sanitized.iter().map(String::as_str))
            .into_iter()
            .zip(documents)
            .map(|(filename, doc)| RenderedDocument { filename, html: doc.html.clone() })
            .collect();
        let blobs = pack(&safe_documents, mode, archive_name)?;
        self.save_blobs(&blobs)
    }

    /// Saves a JSON summary of the run, one entry per input URL.
    pub fn save_manifest(&self, outcomes: &[UrlOutcome]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(MANIFEST_NAME);

        let entries: Vec<ManifestEntry> = outcomes.iter().map(ManifestEntry::from_outcome).collect();
        let manifest = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "succeeded": outcomes.iter().filter(|o| o.is_success()).count(),
            "failed": outcomes.iter().filter(|o| !o.is_success()).count(),
            "urls": entries,
        });

        let manifest_str = serde_json::to_string_pretty(&manifest)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, manifest_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved run manifest to {}", file_path.display());

        Ok(file_path)
    }
}
