//! Configuration for the extraction workflow.
//!
//! Everything the session, the HTTP client and the exporter need lives in
//! [`ExtractorConfig`], built via its [`ExtractorConfigBuilder`]. One struct
//! keeps the CLI mapping trivial and lets `--json` runs echo exactly what was
//! used.

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};

/// Default extraction endpoint of the companion service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/extract-requirements";

/// Boilerplate the service prepends to its answer.
pub const DEFAULT_SENTINEL: &str = "Generated Requirements:";

/// Title heading prepended to every exported document.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Extracted Requirements";

/// File name offered for the exported document.
pub const DEFAULT_ARTIFACT_NAME: &str = "requirements.docx";

/// Message stored in `ExtractionResult::Failed`.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to process PDF";

/// Configuration for one extraction session.
///
/// # Example
/// ```rust
/// use req_extractor::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .endpoint("http://127.0.0.1:9000/extract-requirements")
///     .request_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.artifact_name, "requirements.docx");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// URL the PDF is posted to as `multipart/form-data`.
    pub endpoint: String,

    /// Per-request timeout in seconds. `0` waits indefinitely. Default: 300.
    ///
    /// Model inference on the service side routinely takes minutes for long
    /// documents, so the default is generous. Without a limit a hung request
    /// leaves the session `Pending` until the process exits.
    pub request_timeout_secs: u64,

    /// Message stored in `Failed` results. The transport error itself is
    /// only logged.
    pub failure_message: String,

    /// Leading phrase stripped from service responses.
    pub sentinel: String,

    /// Heading-1 title placed at the top of the exported document.
    pub document_title: String,

    /// File name of the exported document.
    pub artifact_name: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 300,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            document_title: DEFAULT_DOCUMENT_TITLE.to_string(),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Create a new builder for `ExtractorConfig`.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder {
            config: Self::default(),
        }
    }

    /// The request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(std::time::Duration::from_secs(secs)),
        }
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn failure_message(mut self, msg: impl Into<String>) -> Self {
        self.config.failure_message = msg.into();
        self
    }

    pub fn sentinel(mut self, phrase: impl Into<String>) -> Self {
        self.config.sentinel = phrase.into();
        self
    }

    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.config.document_title = title.into();
        self
    }

    pub fn artifact_name(mut self, name: impl Into<String>) -> Self {
        self.config.artifact_name = name.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractorConfig, ExtractorError> {
        let c = &self.config;
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(ExtractorError::InvalidConfig(format!(
                "endpoint must be an http:// or https:// URL, got '{}'",
                c.endpoint
            )));
        }
        if reqwest::Url::parse(&c.endpoint).is_err() {
            return Err(ExtractorError::InvalidConfig(format!(
                "endpoint is not a valid URL: '{}'",
                c.endpoint
            )));
        }
        if c.failure_message.trim().is_empty() {
            return Err(ExtractorError::InvalidConfig(
                "failure message must not be empty".into(),
            ));
        }
        if !c.artifact_name.to_ascii_lowercase().ends_with(".docx") {
            return Err(ExtractorError::InvalidConfig(format!(
                "artifact name must end in .docx, got '{}'",
                c.artifact_name
            )));
        }
        if c.artifact_name.contains(['/', '\\']) {
            return Err(ExtractorError::InvalidConfig(format!(
                "artifact name must be a bare file name, got '{}'",
                c.artifact_name
            )));
        }
        Ok(self.config)
    }
}
