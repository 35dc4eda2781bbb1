// src/utils/text.rs
//! Escaping helpers for embedding extracted text into generated HTML.

/// Escape HTML special characters so text is safe inside element content
/// and double- or single-quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escape text for a table cell, turning line breaks into `<br>`.
pub fn html_escape_multiline(s: &str) -> String {
    html_escape(s).replace("\r\n", "\n").replace('\n', "<br>")
}

/// Encode a string as a JavaScript string literal that can sit inside an
/// inline `<script>` block.
pub fn script_string_literal(s: &str) -> String {
    // serde_json output is a valid JS literal; only `</` can close the script early.
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}
