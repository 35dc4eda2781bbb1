// src/extractors/moea.rs
//! Extractor for the Ministry of Economic Affairs regulation site
//! (law.moea.gov.tw). Its pages list articles flat, without chapters.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{select_first, stripped_text, LawExtractor};
use crate::sources::models::{ArticleRecord, DateLabel, ExtractionResult};
use crate::utils::error::ExtractError;

// --- CSS Selectors (Lazy Static) ---
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1.Title").expect("Failed to compile TITLE_SELECTOR")
});
static INFO_TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.info").expect("Failed to compile INFO_TABLE_SELECTOR")
});
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});
static ARTICLE_BOX_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.law-article-box").expect("Failed to compile ARTICLE_BOX_SELECTOR")
});
static NUMBER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.num").expect("Failed to compile NUMBER_SELECTOR")
});
static TEXT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.text-pre").expect("Failed to compile TEXT_SELECTOR")
});

/// Cells of the `table.info` metadata table, read by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoeaMetadata {
    pub publish_date: String,
    pub amend_date: String,
    pub doc_no: String,
    pub law_system: String,
}

impl MoeaMetadata {
    /// Missing trailing cells default to empty strings.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            publish_date: cell(0),
            amend_date: cell(1),
            doc_no: cell(2),
            law_system: cell(3),
        }
    }

    /// Amendment date when present, else the publish date.
    pub fn effective_date(&self) -> &str {
        if self.amend_date.is_empty() { &self.publish_date } else { &self.amend_date }
    }
}

pub struct MoeaExtractor;

impl MoeaExtractor {
    pub fn new() -> Self { Self {} }

    fn metadata(&self, document: &Html) -> MoeaMetadata {
        let cells: Vec<String> = select_first(document, &INFO_TABLE_SELECTOR)
            .map(|table| table.select(&CELL_SELECTOR).map(|td| stripped_text(td, "")).collect())
            .unwrap_or_default();
        MoeaMetadata::from_cells(&cells)
    }

    fn records(&self, document: &Html) -> Vec<ArticleRecord> {
        document
            .select(&ARTICLE_BOX_SELECTOR)
            .filter_map(|article| {
                let number = article.select(&NUMBER_SELECTOR).next()?;
                let text = article.select(&TEXT_SELECTOR).next()?;
                Some(ArticleRecord {
                    chapter: String::new(),
                    section: String::new(),
                    number: stripped_text(number, ""),
                    text: stripped_text(text, "\n"),
                })
            })
            .collect()
    }
}

impl LawExtractor for MoeaExtractor {
    fn extract(&self, html: &str) -> Result<ExtractionResult, ExtractError> {
        let document = Html::parse_document(html);

        let title = select_first(&document, &TITLE_SELECTOR)
            .map(|el| stripped_text(el, ""))
            .filter(|t| !t.is_empty())
            .ok_or(ExtractError::TitleMissing)?;

        let metadata = self.metadata(&document);
        tracing::debug!(
            "Metadata for '{}': doc no '{}', system '{}'",
            title, metadata.doc_no, metadata.law_system
        );

        // The site labels whichever date is shown as the amendment date.
        Ok(ExtractionResult {
            date_label: DateLabel::Amended,
            date_value: metadata.effective_date().to_string(),
            records: self.records(&document),
            title,
        })
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><head><title>經濟部法規</title></head><body>
        <h1 class="Title"> 經濟部組織法 </h1>
        <table class="info">
          <tr><th>發布日期</th><td>民國 112 年 01 月 10 日</td></tr>
          <tr><th>修正日期</th><td>民國 113 年 03 月 01 日</td></tr>
          <tr><th>發文字號</th><td>經法字第 11304600000 號</td></tr>
          <tr><th>法規體系</th><td>組織</td></tr>
        </table>
        <div class="law-article-box">
          <div class="num">第 1 條</div>
          <div class="text-pre">經濟部掌理全國經濟行政。
          <br>本部置部長一人。</div>
        </div>
        <div class="law-article-box">
          <div class="num">第 2 條</div>
        </div>
        <div class="law-article-box">
          <div class="num">第 3 條</div>
          <div class="text-pre">本法自公布日施行。</div>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_sample_page() {
        let result = MoeaExtractor::new().extract(SAMPLE_PAGE).unwrap();

        assert_eq!(result.title, "經濟部組織法");
        assert_eq!(result.date_label, DateLabel::Amended);
        assert_eq!(result.date_value, "民國 113 年 03 月 01 日");
        assert_eq!(result.records.len(), 2, "box without text is skipped");

        assert_eq!(result.records[0].number, "第 1 條");
        assert_eq!(result.records[0].text, "經濟部掌理全國經濟行政。\n本部置部長一人。");
        assert_eq!(result.records[1].number, "第 3 條");
        assert!(result.records.iter().all(|r| r.chapter.is_empty() && r.section.is_empty()));
    }

    #[test]
    fn test_publish_date_fallback_keeps_amended_label() {
        let html = r#"<html><body><h1 class="Title">某要點</h1>
            <table class="info"><tr><td>民國 100 年 02 月 03 日</td><td></td></tr></table>
            </body></html>"#;
        let result = MoeaExtractor::new().extract(html).unwrap();

        assert_eq!(result.date_value, "民國 100 年 02 月 03 日");
        assert_eq!(result.date_label, DateLabel::Amended);
    }

    #[test]
    fn test_metadata_positional_defaults() {
        let meta = MoeaMetadata::from_cells(&["2020-01-01".to_string(), "2021-06-30".to_string()]);
        assert_eq!(meta.publish_date, "2020-01-01");
        assert_eq!(meta.amend_date, "2021-06-30");
        assert_eq!(meta.doc_no, "");
        assert_eq!(meta.law_system, "");

        assert_eq!(MoeaMetadata::from_cells(&[]), MoeaMetadata::default());
    }

    #[test]
    fn test_missing_info_table_and_articles() {
        let html = r#"<html><body><h1 class="Title">某要點</h1></body></html>"#;
        let result = MoeaExtractor::new().extract(html).unwrap();

        assert_eq!(result.date_value, "");
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let html = r#"<html><body><h1>No class</h1><div class="law-article-box"></div></body></html>"#;
        assert!(matches!(MoeaExtractor::new().extract(html), Err(ExtractError::TitleMissing)));
    }
}
