//! Report document retrieval.

use crate::error::FetchError;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent for report requests.
pub const DEFAULT_USER_AGENT: &str = "Kowloon-Index/0.1 (contact@example.com)";

const PDF_MAGIC: &[u8] = b"%PDF";

/// Fetches report documents and turns them into plain text.
///
/// `http://` and `https://` references are downloaded; anything else is
/// read as a local path (an optional `file://` prefix is stripped).
#[derive(Debug, Clone)]
pub struct ReportClient {
    client: reqwest::Client,
}

impl ReportClient {
    /// Create a client with the default timeout and user agent.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a client with a custom request timeout and user agent.
    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self { client })
    }

    /// Fetch the raw bytes behind a reference.
    pub async fn fetch_bytes(&self, reference: &str) -> Result<Vec<u8>, FetchError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(FetchError::EmptyReference);
        }

        if is_remote(reference) {
            debug!("Downloading report {}", reference);
            let response = self.client.get(reference).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    reference: reference.to_string(),
                });
            }
            Ok(response.bytes().await?.to_vec())
        } else {
            let path = reference.strip_prefix("file://").unwrap_or(reference);
            debug!("Reading report {}", path);
            Ok(tokio::fs::read(Path::new(path)).await?)
        }
    }

    /// Fetch a reference and extract its text.
    pub async fn fetch_text(&self, reference: &str) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(reference).await?;
        document_text(bytes).await
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Decode document bytes: PDFs through the PDF text extractor, everything
/// else as (lossy) UTF-8.
pub async fn document_text(bytes: Vec<u8>) -> Result<String, FetchError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    // The PDF decoder panics on some malformed inputs.
    let extracted = tokio::task::spawn_blocking(move || {
        std::panic::catch_unwind(move || pdf_extract::extract_text_from_mem(&bytes))
    })
    .await
    .map_err(|e| FetchError::Pdf(e.to_string()))?;

    match extracted {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(FetchError::Pdf(format!("{e:?}"))),
        Err(_) => Err(FetchError::Pdf("PDF decoder panicked".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/a.pdf"));
        assert!(is_remote("HTTP://example.com/a.pdf"));
        assert!(!is_remote("/tmp/a.pdf"));
        assert!(!is_remote("file:///tmp/a.pdf"));
    }

    #[tokio::test]
    async fn test_empty_reference() {
        let client = ReportClient::new().unwrap();
        let err = client.fetch_text("  ").await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyReference));
    }

    #[tokio::test]
    async fn test_local_text_report() {
        let path = std::env::temp_dir().join("kowloon_client_local_report.txt");
        std::fs::write(&path, "Revenue: 1,000").unwrap();

        let client = ReportClient::new().unwrap();
        let text = client.fetch_text(path.to_str().unwrap()).await.unwrap();
        assert_eq!(text, "Revenue: 1,000");

        let prefixed = format!("file://{}", path.display());
        assert_eq!(client.fetch_text(&prefixed).await.unwrap(), "Revenue: 1,000");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_missing_local_report_is_io_error() {
        let client = ReportClient::new().unwrap();
        let err = client
            .fetch_text("/definitely/not/a/report.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error() {
        let err = document_text(b"%PDF-1.7 garbage".to_vec()).await.unwrap_err();
        assert!(matches!(err, FetchError::Pdf(_)));
    }
}
