// src/sources/models.rs
/// Marker that identifies an article number cell, e.g. "第 3 條".
pub const ARTICLE_MARKER: char = '條';
/// Marker that identifies a section heading line, e.g. "第一節 通則".
pub const SECTION_MARKER: char = '節';

/// One statute article together with the chapter and section it sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub chapter: String,
    pub section: String,
    pub number: String, // always contains ARTICLE_MARKER
    pub text: String,   // lines separated by '\n'
}

impl ArticleRecord {
    /// Whether a number cell denotes an article rather than a heading.
    pub fn is_article_number(number: &str) -> bool {
        number.contains(ARTICLE_MARKER)
    }
}

/// Which metadata row the date value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLabel {
    Amended,
    Promulgated,
}

impl DateLabel {
    /// Label as printed on the source sites and in the rendered document.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateLabel::Amended => "修正日期",
            DateLabel::Promulgated => "發布日期",
        }
    }
}

/// Normalized output of every source extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: String,
    pub date_label: DateLabel,
    pub date_value: String,
    pub records: Vec<ArticleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_number_classification() {
        assert!(ArticleRecord::is_article_number("第 1 條"));
        assert!(ArticleRecord::is_article_number("第十條之一"));
        assert!(!ArticleRecord::is_article_number("第一節"));
        assert!(!ArticleRecord::is_article_number(""));
    }

    #[test]
    fn test_date_labels() {
        assert_eq!(DateLabel::Amended.as_str(), "修正日期");
        assert_eq!(DateLabel::Promulgated.as_str(), "發布日期");
    }
}
