//! Error types for the req-extractor library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractorError`] — **Fatal** for the operation that returned it: the
//!   file could not be read, the service could not be reached, the document
//!   could not be packaged. Returned as `Err(ExtractorError)`.
//!
//! * [`ValidationError`] — **Recoverable**: the user picked the wrong file
//!   (or none at all). It never reaches the extraction result; the session
//!   keeps it as an inline message until the next valid selection.
//!
//! Extraction failures seen by the session are a third case: they are stored
//! as [`crate::session::ExtractionResult::Failed`] with a generic message, and
//! the underlying [`ExtractorError`] is only logged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the req-extractor library.
#[derive(Debug, Error)]
pub enum ExtractorError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading input.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Service errors ────────────────────────────────────────────────────
    /// The request never produced an HTTP response (DNS, connect, reset…).
    #[error("Extraction request failed: {reason}")]
    Transport { reason: String },

    /// The service answered with a non-2xx status.
    #[error("Extraction service returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The request exceeded the configured timeout.
    #[error("Extraction request timed out after {secs}s\nIncrease --timeout or pass 0 to wait indefinitely.")]
    Timeout { secs: u64 },

    // ── Export errors ─────────────────────────────────────────────────────
    /// docx packaging failed.
    #[error("Failed to build Word document: {detail}")]
    ExportFailed { detail: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A recoverable, user-facing problem with the chosen file.
///
/// Display strings are short enough to show inline next to the upload zone.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Submit was requested before any file was selected.
    #[error("Please select a PDF file")]
    NoFile,

    /// A picked file is not a PDF.
    #[error("Please select a PDF file ('{name}' is {mime_type})")]
    NotAPdf { name: String, mime_type: String },

    /// A dropped file is not a PDF, or the drop carried no file at all.
    #[error("Please drop a PDF file")]
    NotAPdfDrop,
}
