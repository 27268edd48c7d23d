//! Upload candidates: the file a user has staged for extraction.
//!
//! A candidate carries its bytes, a *declared* MIME type and a display name.
//! The session only ever checks the declared type, the same contract a
//! browser file input offers. [`UploadCandidate::from_path`] plays the part of
//! the browser when files come from disk: it declares `application/pdf` for a
//! `.pdf` extension or a `%PDF` header and a generic binary type otherwise.

use crate::error::ExtractorError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The only MIME type the extraction service accepts.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type declared for files that are not recognisably PDFs.
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A file chosen via picker, drop or command line.
///
/// Content is shared behind an `Arc` so a pending submission can hold it
/// while the session still reports the candidate.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    content: Arc<[u8]>,
    mime_type: String,
    name: String,
}

impl UploadCandidate {
    pub fn new(content: impl Into<Vec<u8>>, mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: Arc::from(content.into()),
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Read a local file and declare its type from extension and magic bytes.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExtractorError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ExtractorError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ExtractorError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let mime_type = declared_mime_type(path, &bytes);
        let name = display_name(path);
        debug!("Staged '{}' ({} bytes, {})", name, bytes.len(), mime_type);

        Ok(Self::new(bytes, mime_type, name))
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the declared type allows submission.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME
    }
}

impl fmt::Debug for UploadCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCandidate")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.content.len())
            .finish()
    }
}

fn declared_mime_type(path: &Path, bytes: &[u8]) -> &'static str {
    let has_pdf_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if has_pdf_ext || bytes.starts_with(PDF_MAGIC) {
        PDF_MIME
    } else {
        OCTET_STREAM_MIME
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}
