// src/pipeline/mod.rs
use crate::sources::client::Fetch;
use crate::sources::models::ExtractionResult;
use crate::sources::SourceSite;
use crate::utils::error::AppError;

/// Result of processing a single URL.
#[derive(Debug)]
pub enum Outcome {
    Success(ExtractionResult),
    Failure(AppError),
}

#[derive(Debug)]
pub struct UrlOutcome {
    pub url: String,
    pub outcome: Outcome,
}

impl UrlOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }
}

/// Splits user input into URLs: one per line, trimmed, blank lines dropped.
pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs URLs through fetch and extraction one at a time.
pub struct Pipeline<F> {
    fetcher: F,
}

impl<F: Fetch> Pipeline<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Processes every URL in input order. A failing URL is recorded and
    /// never stops the URLs after it.
    pub async fn run(&self, urls: &[String]) -> Vec<UrlOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());

        for (i, url) in urls.iter().enumerate() {
            tracing::info!("[{}/{}] Processing: {}", i + 1, urls.len(), url);

            let outcome = match self.process(url).await {
                Ok(result) => {
                    tracing::info!("Extracted '{}': {} articles", result.title, result.records.len());
                    Outcome::Success(result)
                }
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", url, e);
                    Outcome::Failure(e)
                }
            };

            outcomes.push(UrlOutcome { url: url.clone(), outcome });
        }

        outcomes
    }

    async fn process(&self, url: &str) -> Result<ExtractionResult, AppError> {
        // Resolve the site first so unsupported URLs are never fetched
        let site = SourceSite::from_url(url)?;
        tracing::debug!("Using {} extractor for {}", site.name(), url);

        let html = self.fetcher.fetch(url).await?;
        Ok(site.extract(&html)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ExtractError, FetchError};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages and records which URLs were requested.
    struct StubFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages.iter().map(|(u, p)| (u.to_string(), p.to_string())).collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Http {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
        }
    }

    const MOJ_URL: &str = "https://law.moj.gov.tw/LawClass/LawAll.aspx?pcode=J0130002";
    const MOEA_URL: &str = "https://law.moea.gov.tw/LawContent.aspx?id=GL000387";

    const MOJ_PAGE: &str = r#"<html><head><title>職業安全衛生法-全國法規資料庫</title></head><body>
        <div class="law-content"><div class="law-reg-content">
          <div class="h3 char-2">第 一 章 總則</div>
          <div class="row"><div class="col-no">第 1 條</div><div class="col-data">為防止職業災害，特制定本法。</div></div>
        </div></div></body></html>"#;

    const MOEA_PAGE: &str = r#"<html><body><h1 class="Title">經濟部處務規程</h1>
        <div class="law-article-box"><div class="num">第 1 條</div><div class="text-pre">本規程依組織法訂定之。</div></div>
        <div class="law-article-box"><div class="num">第 2 條</div><div class="text-pre">本部置秘書。</div></div>
        </body></html>"#;

    #[test]
    fn test_parse_url_list() {
        let input = "\n  https://law.moj.gov.tw/a  \n\n\t\nhttps://law.moea.gov.tw/b\r\n   ";
        assert_eq!(
            parse_url_list(input),
            vec!["https://law.moj.gov.tw/a".to_string(), "https://law.moea.gov.tw/b".to_string()]
        );
        assert!(parse_url_list("  \n ").is_empty());
    }

    #[test]
    fn test_failure_is_isolated() {
        let fetcher = StubFetcher::new(&[(MOJ_URL, MOJ_PAGE), (MOEA_URL, MOEA_PAGE)]);
        let pipeline = Pipeline::new(fetcher);
        let urls = vec![MOJ_URL.to_string(), "https://example.com/law".to_string(), MOEA_URL.to_string()];

        let outcomes = tokio_test::block_on(pipeline.run(&urls));

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().map(|o| o.url.as_str()).collect::<Vec<_>>(), urls.iter().map(String::as_str).collect::<Vec<_>>());

        match &outcomes[0].outcome {
            Outcome::Success(result) => {
                assert_eq!(result.title, "職業安全衛生法");
                assert_eq!(result.records.len(), 1);
                assert_eq!(result.records[0].chapter, "第 一 章 總則");
            }
            Outcome::Failure(e) => panic!("first URL should succeed: {e}"),
        }
        assert!(matches!(
            &outcomes[1].outcome,
            Outcome::Failure(AppError::Extraction(ExtractError::UnsupportedSource(_)))
        ));
        match &outcomes[2].outcome {
            Outcome::Success(result) => assert_eq!(result.records.len(), 2),
            Outcome::Failure(e) => panic!("third URL should succeed: {e}"),
        }

        // Unsupported URL is rejected before any fetch
        assert_eq!(*pipeline.fetcher.requested.borrow(), vec![MOJ_URL.to_string(), MOEA_URL.to_string()]);
    }

    #[test]
    fn test_fetch_and_title_failures_are_recorded() {
        let fetcher = StubFetcher::new(&[(MOEA_URL, "<html><body>maintenance</body></html>")]);
        let pipeline = Pipeline::new(fetcher);
        let urls = vec![MOJ_URL.to_string(), MOEA_URL.to_string()];

        let outcomes = tokio_test::block_on(pipeline.run(&urls));

        assert!(matches!(&outcomes[0].outcome, Outcome::Failure(AppError::Fetch(FetchError::Http { .. }))));
        assert!(matches!(
            &outcomes[1].outcome,
            Outcome::Failure(AppError::Extraction(ExtractError::TitleMissing))
        ));
        assert!(outcomes.iter().all(|o| !o.is_success()));
    }
}
