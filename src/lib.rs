//! # req-extractor
//!
//! Send a PDF to a requirements-extraction service, keep the markdown it
//! returns, and export that markdown as a Word document.
//!
//! ## Workflow Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Select   stage a candidate (picker, drop, or path); PDFs only
//!  ├─ 2. Submit   one multipart upload at a time → Pending
//!  ├─ 3. Result   cleaned markdown (Succeeded) or a generic error (Failed)
//!  └─ 4. Export   markdown → one block per line → requirements.docx
//! ```
//!
//! The extraction itself happens in a remote service reached over HTTP; this
//! crate owns the session state machine around it and the exporter after it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use req_extractor::{
//!     write_artifact, ExtractionSession, ExtractorConfig, HttpExtractionService, UploadCandidate,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractorConfig::default();
//!     let service = HttpExtractionService::new(&config)?;
//!     let mut session = ExtractionSession::new(config)?;
//!
//!     session.select_file(UploadCandidate::from_path("srs.pdf")?)?;
//!     session.submit(&service).await;
//!
//!     if let Some(artifact) = session.export()? {
//!         write_artifact(&artifact, ".")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `req-extract` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod candidate;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod service;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use candidate::{UploadCandidate, PDF_MIME};
pub use cleanup::{clean_response, ResponseCleaner};
pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use error::{ExtractorError, ValidationError};
pub use events::{NoopObserver, Observer, SessionObserver};
pub use export::{
    build_document, classify_line, export_markdown, write_artifact, Artifact, DocumentBlock,
    HeadingLevel, TextRun,
};
pub use service::{ExtractionService, HttpExtractionService};
pub use session::{Affordances, ExtractionResult, ExtractionSession, SharedSession, Submission};
