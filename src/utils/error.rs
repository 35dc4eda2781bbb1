// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error {status} for {url}")]
    Http {
        status: reqwest::StatusCode, // e.g., 404 Not Found, 403 Forbidden
        url: String,
    },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported source, no extractor matches URL: {0}")]
    UnsupportedSource(String),

    #[error("Page <title> not found, cannot name the output file")]
    TitleNotFound,

    #[error("Law title heading (h1.Title) missing from page")]
    TitleMissing,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Fetching failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = AppError::from(ExtractError::UnsupportedSource("https://example.com/law".to_string()));
        assert!(err.to_string().contains("https://example.com/law"));
        assert!(err.to_string().starts_with("Extraction failed"));

        let err = FetchError::Http { status: reqwest::StatusCode::NOT_FOUND, url: "https://law.moj.gov.tw/x".to_string() };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("https://law.moj.gov.tw/x"));
    }
}
