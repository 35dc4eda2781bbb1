// src/extractors/mod.rs
pub mod moea;
pub mod moj;

use scraper::{ElementRef, Html, Selector};

use crate::sources::models::ExtractionResult;
use crate::utils::error::ExtractError;

/// Turns one site's raw page markup into the normalized extraction result.
pub trait LawExtractor {
    fn extract(&self, html: &str) -> Result<ExtractionResult, ExtractError>;
}

/// Text nodes of an element, each trimmed, empty ones dropped, joined by `sep`.
pub(crate) fn stripped_text(element: ElementRef<'_>, sep: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Full text content of an element, trimmed at both ends only.
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First element in the document matching `selector`.
pub(crate) fn select_first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

pub(crate) fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_helpers() {
        let doc = Html::parse_fragment(r#"<div class="a b"> 一、甲 <p>  二、乙 </p><p>   </p> 三 </div>"#);
        let sel = Selector::parse("div").unwrap();
        let div = doc.select(&sel).next().unwrap();

        assert_eq!(stripped_text(div, "\n"), "一、甲\n二、乙\n三");
        assert_eq!(stripped_text(div, ""), "一、甲二、乙三");
        assert!(trimmed_text(div).starts_with("一、甲"));
        assert!(trimmed_text(div).ends_with("三"));
        assert!(has_class(div, "b"));
        assert!(!has_class(div, "c"));
    }
}
