//! Markdown → Word export.
//!
//! Export is synchronous and pure up to the final file write: it reads a
//! snapshot of the extracted text and never touches session state.
//!
//! ```text
//! markdown ──▶ blocks ──▶ docx ──▶ Artifact ──▶ disk
//!            (classify)  (pack)   (name+bytes)  (atomic write)
//! ```
//!
//! 1. [`blocks`] — one [`DocumentBlock`] per input line
//! 2. [`docx`]   — title heading + one Word paragraph per block

pub mod blocks;
pub mod docx;

pub use blocks::{build_document, classify_line, DocumentBlock, HeadingLevel, TextRun};

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use std::path::{Path, PathBuf};
use tracing::info;

/// A packaged document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Build, serialise and name the document for `markdown`.
pub fn export_markdown(markdown: &str, config: &ExtractorConfig) -> Result<Artifact, ExtractorError> {
    let blocks = build_document(markdown);
    let bytes = docx::serialize(&blocks, &config.document_title)?;
    Ok(Artifact {
        file_name: config.artifact_name.clone(),
        bytes,
    })
}

/// Save `artifact` to disk and return the final path.
///
/// `target` may be a directory (the artifact's own file name is used) or a
/// full file path. The bytes go to a sibling `.tmp` file first and are then
/// renamed into place so a crash never leaves a truncated document behind.
pub fn write_artifact(artifact: &Artifact, target: impl AsRef<Path>) -> Result<PathBuf, ExtractorError> {
    let target = target.as_ref();
    let path = if target.is_dir() {
        target.join(&artifact.file_name)
    } else {
        target.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ExtractorError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    }

    let tmp_path = path.with_extension("docx.tmp");
    std::fs::write(&tmp_path, &artifact.bytes).map_err(|e| ExtractorError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    })?;
    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ExtractorError::OutputWriteFailed { path, source: e });
    }

    info!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
    Ok(path)
}
