// src/render/mod.rs
pub mod annotation;
mod assets;

use crate::sources::models::ExtractionResult;
use crate::utils::text::{html_escape, html_escape_multiline, script_string_literal};
use annotation::Annotation;

pub const EXPORT_SUFFIX: &str = "_updated.html";

const DATA_HEADERS: [&str; 4] = ["章", "章節", "條", "條文內容"];
const ANNOTATION_HEADERS: [&str; 4] = ["定義條文", "是否適用", "是否符合", "備註"];

/// Which artifact format to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Table with editable review columns and the export script.
    #[default]
    Annotated,
    /// Static read-only table.
    Legacy,
}

/// A finished HTML document with the file name it should be delivered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub html: String,
}

pub struct Renderer {
    mode: RenderMode,
}

impl Renderer {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// Renders a fresh document; every row starts with default annotations.
    pub fn render(&self, result: &ExtractionResult) -> RenderedDocument {
        self.render_with_annotations(result, &[])
    }

    /// Renders a document whose rows carry the given frozen annotations,
    /// matched to records by position. Missing entries use defaults.
    pub fn render_with_annotations(&self, result: &ExtractionResult, annotations: &[Annotation]) -> RenderedDocument {
        let annotated = self.mode == RenderMode::Annotated;
        let title = html_escape(&result.title);

        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n<style>{}", title, assets::BASE_STYLE));
        if annotated {
            html.push_str(assets::ANNOTATION_STYLE);
        }
        html.push_str("</style>\n");
        if annotated {
            let export_name = script_string_literal(&format!("{}{}", result.title, EXPORT_SUFFIX));
            html.push_str("<script>");
            html.push_str(&assets::ANNOTATION_SCRIPT.replace(assets::EXPORT_NAME_PLACEHOLDER, &export_name));
            html.push_str("</script>\n");
        }
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!("<h2>{}</h2>\n", title));
        html.push_str(&format!(
            "<p><strong>{}：</strong>{}</p>\n",
            result.date_label.as_str(),
            html_escape(&result.date_value)
        ));

        html.push_str("<table class=\"law-table\">\n<thead><tr>");
        for header in DATA_HEADERS {
            html.push_str(&format!("<th>{}</th>", header));
        }
        if annotated {
            for header in ANNOTATION_HEADERS {
                html.push_str(&format!("<th>{}</th>", header));
            }
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        let default_annotation = Annotation::default();
        for (i, record) in result.records.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                html_escape(&record.chapter),
                html_escape(&record.section),
                html_escape(&record.number),
                html_escape_multiline(&record.text)
            ));
            if annotated {
                html.push_str(&annotations.get(i).unwrap_or(&default_annotation).control_cells());
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");

        if annotated {
            html.push_str(assets::BUTTON_BAR);
            html.push('\n');
        }
        html.push_str("</body>\n</html>\n");

        tracing::debug!("Rendered {} rows for '{}' ({:?})", result.records.len(), result.title, self.mode);

        RenderedDocument {
            filename: format!("{}.html", result.title),
            html,
        }
    }
}
