//! The remote extraction service.
//!
//! The service is an opaque collaborator: it takes a PDF as a multipart
//! upload and answers with markdown. [`ExtractionService`] is the seam the
//! session talks to, so tests (and alternative transports) can stand in for
//! the HTTP client without a network.

use crate::candidate::UploadCandidate;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

/// Multipart field name the service reads the PDF from.
pub const FILE_FIELD: &str = "file";

/// Something that turns a PDF into markdown text.
///
/// Implementations return the raw response body; cleanup is the session's
/// job. Any error is treated uniformly as an extraction failure.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, candidate: &UploadCandidate) -> Result<String, ExtractorError>;
}

/// reqwest-backed client for the HTTP extraction endpoint.
#[derive(Debug, Clone)]
pub struct HttpExtractionService {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpExtractionService {
    /// Build a client for `config.endpoint`, honouring the request timeout.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ExtractorError::Transport {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> ExtractorError {
        if e.is_timeout() {
            ExtractorError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            ExtractorError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract(&self, candidate: &UploadCandidate) -> Result<String, ExtractorError> {
        info!("Uploading '{}' to {}", candidate.name(), self.endpoint);

        let part = Part::bytes(candidate.content().to_vec())
            .file_name(candidate.name().to_string())
            .mime_str(candidate.mime_type())
            .map_err(|e| ExtractorError::Transport {
                reason: format!("invalid MIME type '{}': {e}", candidate.mime_type()),
            })?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        debug!("Service answered HTTP {} with {} bytes", status.as_u16(), body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_endpoint() {
        let config = ExtractorConfig::builder()
            .endpoint("http://127.0.0.1:1/extract-requirements")
            .build()
            .unwrap();
        let svc = HttpExtractionService::new(&config).unwrap();
        assert_eq!(svc.endpoint(), "http://127.0.0.1:1/extract-requirements");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        // Port 1 on loopback is reserved and refuses connections.
        let config = ExtractorConfig::builder()
            .endpoint("http://127.0.0.1:1/extract-requirements")
            .request_timeout_secs(5)
            .build()
            .unwrap();
        let svc = HttpExtractionService::new(&config).unwrap();
        let candidate = UploadCandidate::new(b"%PDF-1.4".to_vec(), "application/pdf", "a.pdf");

        let err = svc.extract(&candidate).await.unwrap_err();
        assert!(
            matches!(err, ExtractorError::Transport { .. } | ExtractorError::Timeout { .. }),
            "got: {err:?}"
        );
    }
}
