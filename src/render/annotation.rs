// src/render/annotation.rs
//! Review annotations attached to every article row of an annotated
//! document.
//!
//! Each control keeps its confirmed value in a durable attribute
//! (`data-selected` on selects, `data-content` on the remarks textarea).
//! The embedded script writes those attributes when edits are confirmed and
//! re-applies them when the document is opened, so an exported copy carries
//! the review with it. [`Annotation::control_cells`] writes that state and
//! [`read_annotations`] reads it back from an exported file.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::stripped_text;
use crate::utils::text::html_escape;

pub const SELECT_STATE_ATTR: &str = "data-selected";
pub const TEXT_STATE_ATTR: &str = "data-content";

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table > tbody > tr").expect("Failed to compile ROW_SELECTOR")
});
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});
static CONTROL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("select, textarea").expect("Failed to compile CONTROL_SELECTOR")
});

// Annotation columns follow the four data columns in this order. Older
// exports carry no `data-field`, so the column names the control.
const DATA_COLUMNS: usize = 4;
const FIELD_COLUMNS: [&str; 4] = ["defining", "applicability", "compliance", "remarks"];
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2").expect("Failed to compile HEADING_SELECTOR")
});

/// "Is this a definitions article?"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Defining {
    #[default]
    No,
    Yes,
}

impl Defining {
    pub const ALL: [Defining; 2] = [Defining::No, Defining::Yes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Defining::No => "否",
            Defining::Yes => "是",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Applicability {
    #[default]
    Unset,
    Applicable,
    NotApplicable,
}

impl Applicability {
    pub const ALL: [Applicability; 3] = [Applicability::Unset, Applicability::Applicable, Applicability::NotApplicable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Applicability::Unset => "",
            Applicability::Applicable => "適用",
            Applicability::NotApplicable => "不適用",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compliance {
    #[default]
    Unset,
    Compliant,
    NonCompliant,
}

impl Compliance {
    pub const ALL: [Compliance; 3] = [Compliance::Unset, Compliance::Compliant, Compliance::NonCompliant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compliance::Unset => "",
            Compliance::Compliant => "符合",
            Compliance::NonCompliant => "不符合",
        }
    }
}

// Lenient lookup: older exports padded the empty option with a space.
fn parse_choice<T: Copy + Default>(all: &[T], label: fn(&T) -> &'static str, value: &str) -> T {
    let value = value.trim();
    all.iter().copied().find(|c| label(c) == value).unwrap_or_else(|| {
        if !value.is_empty() {
            tracing::warn!("Unrecognized annotation value '{}', using default", value);
        }
        T::default()
    })
}

/// Review state of one article row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub defining: Defining,
    pub applicability: Applicability,
    pub compliance: Compliance,
    pub remarks: String,
}

impl Annotation {
    /// The four annotation `<td>` cells, disabled until edit mode is toggled.
    pub fn control_cells(&self) -> String {
        let mut cells = String::new();
        cells.push_str(&select_cell("defining", Defining::No.as_str(), self.defining.as_str(),
            Defining::ALL.iter().map(Defining::as_str)));
        cells.push_str(&select_cell("applicability", Applicability::Unset.as_str(), self.applicability.as_str(),
            Applicability::ALL.iter().map(Applicability::as_str)));
        cells.push_str(&select_cell("compliance", Compliance::Unset.as_str(), self.compliance.as_str(),
            Compliance::ALL.iter().map(Compliance::as_str)));
        cells.push_str(&format!(
            "<td><textarea class=\"annotation\" data-field=\"remarks\" data-default=\"\" {}=\"{}\" disabled></textarea></td>",
            TEXT_STATE_ATTR,
            html_escape(&self.remarks)
        ));
        cells
    }

    fn apply_control(&mut self, control: ElementRef<'_>, column_field: &str) {
        let el = control.value();
        let state_attr = if el.name() == "textarea" { TEXT_STATE_ATTR } else { SELECT_STATE_ATTR };
        let Some(value) = el.attr(state_attr).or_else(|| el.attr("data-default")) else {
            return;
        };

        match el.attr("data-field").or(Some(column_field)) {
            Some("defining") => self.defining = parse_choice(&Defining::ALL, Defining::as_str, value),
            Some("applicability") => self.applicability = parse_choice(&Applicability::ALL, Applicability::as_str, value),
            Some("compliance") => self.compliance = parse_choice(&Compliance::ALL, Compliance::as_str, value),
            Some("remarks") => self.remarks = value.to_string(),
            other => tracing::debug!("Ignoring annotation control with field {:?}", other),
        }
    }
}

fn select_cell<'a>(field: &str, default: &str, current: &str, options: impl Iterator<Item = &'a str>) -> String {
    let options: String = options
        .map(|o| format!("<option value=\"{0}\">{0}</option>", html_escape(o)))
        .collect();
    format!(
        "<td><select class=\"annotation\" data-field=\"{}\" data-default=\"{}\" {}=\"{}\" disabled>{}</select></td>",
        field,
        html_escape(default),
        SELECT_STATE_ATTR,
        html_escape(current),
        options
    )
}

/// One article row of an exported document with its frozen review state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedArticle {
    pub number: String,
    pub annotation: Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewedDocument {
    pub title: String,
    pub articles: Vec<AnnotatedArticle>,
}

/// Reads the durable annotation state back out of a rendered or exported
/// document. Rows without controls (legacy documents) get default values.
pub fn read_annotations(html: &str) -> ReviewedDocument {
    let document = Html::parse_document(html);

    let title = document
        .select(&HEADING_SELECTOR)
        .next()
        .map(|h| stripped_text(h, ""))
        .unwrap_or_default();

    let articles = document
        .select(&ROW_SELECTOR)
        .map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
            let number = cells.get(2).map(|td| stripped_text(*td, "")).unwrap_or_default();
            let mut annotation = Annotation::default();
            for (cell, field) in cells.iter().skip(DATA_COLUMNS).zip(FIELD_COLUMNS) {
                if let Some(control) = cell.select(&CONTROL_SELECTOR).next() {
                    annotation.apply_control(control, field);
                }
            }
            AnnotatedArticle { number, annotation }
        })
        .collect();

    ReviewedDocument { title, articles }
}
