// src/extractors/moj.rs
//! Extractor for the national Laws & Regulations Database (law.moj.gov.tw).
//!
//! Article rows carry no chapter or section of their own; headings appear
//! as sibling blocks before the rows they govern. The extractor classifies
//! every direct child of the regulation container into a [`Block`] and
//! folds over them with a [`HeadingContext`] accumulator.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{has_class, select_first, stripped_text, trimmed_text, LawExtractor};
use crate::sources::models::{ArticleRecord, DateLabel, ExtractionResult, ARTICLE_MARKER, SECTION_MARKER};
use crate::utils::error::ExtractError;

// --- CSS Selectors (Lazy Static) ---
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to compile TITLE_SELECTOR")
});

// Amendment date row wins over the promulgation date row
static AMENDED_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr#trLNNDate").expect("Failed to compile AMENDED_ROW_SELECTOR")
});
static PROMULGATED_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr#trLNODate").expect("Failed to compile PROMULGATED_ROW_SELECTOR")
});
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});

static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.law-content").expect("Failed to compile CONTENT_SELECTOR")
});
static REG_CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.law-reg-content").expect("Failed to compile REG_CONTENT_SELECTOR")
});
static NUMBER_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.col-no").expect("Failed to compile NUMBER_CELL_SELECTOR")
});
static DATA_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.col-data").expect("Failed to compile DATA_CELL_SELECTOR")
});

/// A direct child of the regulation container, classified by its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `div.h3.char-2`: a chapter heading.
    Chapter(String),
    /// `div.row` with both a number cell and a data cell.
    Row { number: String, text: String },
    Other,
}

impl Block {
    pub fn classify(element: ElementRef<'_>) -> Self {
        if has_class(element, "h3") && has_class(element, "char-2") {
            return Block::Chapter(stripped_text(element, ""));
        }

        if has_class(element, "row") {
            let number_cell = element.select(&NUMBER_CELL_SELECTOR).next();
            let data_cell = element.select(&DATA_CELL_SELECTOR).next();
            if let (Some(number_cell), Some(data_cell)) = (number_cell, data_cell) {
                return Block::Row {
                    number: stripped_text(number_cell, ""),
                    text: stripped_text(data_cell, "\n"),
                };
            }
        }

        Block::Other
    }
}

/// Chapter and section in force at the current point of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingContext {
    pub chapter: String,
    pub section: String,
}

impl HeadingContext {
    /// Applies one block: headings update the context, article rows are
    /// emitted under it.
    pub fn apply(self, block: Block) -> (Self, Option<ArticleRecord>) {
        match block {
            Block::Chapter(chapter) => (Self { chapter, ..self }, None),
            Block::Row { number, text } if ArticleRecord::is_article_number(&number) => {
                let record = ArticleRecord {
                    chapter: self.chapter.clone(),
                    section: self.section.clone(),
                    number,
                    text,
                };
                (self, Some(record))
            }
            Block::Row { text, .. } if text.contains(SECTION_MARKER) && !text.contains(ARTICLE_MARKER) => {
                (Self { section: text, ..self }, None)
            }
            Block::Row { .. } | Block::Other => (self, None),
        }
    }
}

/// Folds blocks in document order into article records.
pub fn fold_blocks<I>(blocks: I) -> Vec<ArticleRecord>
where
    I: IntoIterator<Item = Block>,
{
    let (_, records) = blocks.into_iter().fold(
        (HeadingContext::default(), Vec::new()),
        |(context, mut records), block| {
            let (context, record) = context.apply(block);
            records.extend(record);
            (context, records)
        },
    );
    records
}

pub struct MojExtractor;

impl MojExtractor {
    pub fn new() -> Self { Self {} }

    fn title(&self, document: &Html) -> Result<String, ExtractError> {
        // "<law name>-全國法規資料庫"
        let title = select_first(document, &TITLE_SELECTOR)
            .map(|el| el.text().collect::<String>())
            .ok_or(ExtractError::TitleNotFound)?;
        let title = title.split('-').next().unwrap_or_default().trim().to_string();

        if title.is_empty() {
            return Err(ExtractError::TitleNotFound);
        }
        Ok(title)
    }

    fn date(&self, document: &Html) -> (DateLabel, String) {
        let row = select_first(document, &AMENDED_ROW_SELECTOR)
            .map(|row| (DateLabel::Amended, row))
            .or_else(|| select_first(document, &PROMULGATED_ROW_SELECTOR).map(|row| (DateLabel::Promulgated, row)));

        match row {
            Some((label, row)) => {
                let value = row.select(&CELL_SELECTOR).next().map(trimmed_text).unwrap_or_default();
                (label, value)
            }
            None => (DateLabel::Amended, String::new()),
        }
    }

    fn blocks(&self, document: &Html) -> Vec<Block> {
        let Some(container) = select_first(document, &CONTENT_SELECTOR)
            .and_then(|content| content.select(&REG_CONTENT_SELECTOR).next())
        else {
            tracing::warn!("Regulation content container not found, no articles extracted");
            return Vec::new();
        };

        container
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "div")
            .map(Block::classify)
            .collect()
    }
}

impl LawExtractor for MojExtractor {
    fn extract(&self, html: &str) -> Result<ExtractionResult, ExtractError> {
        let document = Html::parse_document(html);

        let title = self.title(&document)?;
        let (date_label, date_value) = self.date(&document);
        let blocks = self.blocks(&document);
        tracing::debug!("Classified {} content blocks for '{}'", blocks.len(), title);

        let records = fold_blocks(blocks);

        Ok(ExtractionResult { title, date_label, date_value, records })
    }
}
