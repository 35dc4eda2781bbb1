// src/sources/client.rs
use crate::utils::error::{AppError, FetchError};
use encoding_rs::Encoding;
use reqwest::header;
use std::time::Duration;

const LAW_USER_AGENT: &str = concat!("law_extractor/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Capability to fetch a page's text by URL.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches law pages over HTTP, decoding bodies with a caller-chosen charset.
pub struct HttpFetcher {
    client: reqwest::Client,
    encoding: &'static Encoding,
}

impl HttpFetcher {
    /// Creates a fetcher with a request timeout and the charset every body is
    /// decoded with, whatever the response headers declare.
    pub fn new(encoding: &str, timeout: Duration) -> Result<Self, AppError> {
        let encoding = Encoding::for_label(encoding.trim().as_bytes())
            .ok_or_else(|| AppError::Config(format!("Unknown text encoding: '{}'", encoding)))?;

        let client = reqwest::Client::builder()
            .user_agent(LAW_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::from)?; // Propagate client build error if any

        Ok(Self { client, encoding })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Downloading document from: {}", url);

        let response = self.client.get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?; // Propagates reqwest::Error as FetchError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP error status: {} for URL: {}", status, url);
            return Err(FetchError::Http { status, url: url.to_string() });
        }

        let bytes = response.bytes().await?;
        let (body, had_errors) = self.encoding.decode_without_bom_handling(&bytes);
        if had_errors {
            tracing::warn!("Body of {} is not valid {}, replaced malformed sequences", url, self.encoding.name());
        }
        tracing::debug!("Downloaded {} bytes from {} (charset {})", bytes.len(), url, self.encoding.name());

        Ok(body.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    // Serves one canned response on a local port and returns its URL.
    fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                content_type,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{}/LawAll.aspx", addr)
    }

    // Same decoding setup as `new`, but never routed through an HTTP proxy.
    fn local_fetcher(label: &str) -> HttpFetcher {
        let fetcher = HttpFetcher::new(label, Duration::from_secs(5)).unwrap();
        let client = reqwest::Client::builder().no_proxy().timeout(Duration::from_secs(5)).build().unwrap();
        HttpFetcher { client, ..fetcher }
    }

    #[test]
    fn test_create_fetcher() {
        let fetcher = HttpFetcher::new(DEFAULT_ENCODING, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(fetcher.is_ok());
        assert!(HttpFetcher::new("Big5", Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_unknown_encoding_is_config_error() {
        let result = HttpFetcher::new("klingon-8", Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("klingon-8")));
    }

    #[tokio::test]
    async fn test_configured_encoding_overrides_declared_charset() {
        let url = serve_once("200 OK", "text/html; charset=iso-8859-1", "<h1>公司法</h1>".as_bytes());
        let fetcher = local_fetcher("utf-8");

        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, "<h1>公司法</h1>");
    }

    #[tokio::test]
    async fn test_big5_body_decoded_with_configured_encoding() {
        // "公司法" in Big5.
        let url = serve_once("200 OK", "text/html; charset=utf-8", b"\xa4\xbd\xa5\x71\xaa\x6b");
        let fetcher = local_fetcher("big5");

        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, "公司法");
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let url = serve_once("404 Not Found", "text/html", b"");
        let fetcher = local_fetcher(DEFAULT_ENCODING);

        let result = fetcher.fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Http { status, .. }) if status == reqwest::StatusCode::NOT_FOUND));
    }
}
