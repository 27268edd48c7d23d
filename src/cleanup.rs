//! Response cleanup: strip the service's leading boilerplate.
//!
//! The extraction model tends to open its answer with a fixed phrase
//! ("Generated Requirements:") that reads as noise once the text is shown
//! under its own heading. This pass removes that phrase plus the decoration
//! and whitespace around it. It is a best-effort strip, not a parser: any
//! text is accepted, including empty text, and nothing but the leading
//! boilerplate is touched.

use crate::config::DEFAULT_SENTINEL;
use crate::error::ExtractorError;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_CLEANER: Lazy<ResponseCleaner> =
    Lazy::new(|| ResponseCleaner::new(DEFAULT_SENTINEL).unwrap());

/// Clean a response body using the default sentinel phrase.
pub fn clean_response(input: &str) -> String {
    DEFAULT_CLEANER.clean(input)
}

/// Strips a configured sentinel phrase from the start of a response.
#[derive(Debug, Clone)]
pub struct ResponseCleaner {
    leading: Option<Regex>,
}

impl ResponseCleaner {
    /// Compile a cleaner for `sentinel`. An empty sentinel disables stripping.
    ///
    /// The phrase must be followed by its colon or end its line; prose that
    /// merely starts with the same words is left alone. Markdown emphasis or
    /// heading marks around it are consumed too, so
    /// `**Generated Requirements:**` and `## Generated Requirements` both go.
    /// Blank lines after the sentinel are dropped, but the first content line
    /// keeps its indentation.
    pub fn new(sentinel: &str) -> Result<Self, ExtractorError> {
        let phrase = sentinel.trim().trim_end_matches(':').trim_end();
        if phrase.is_empty() {
            return Ok(Self { leading: None });
        }

        let pattern = format!(
            r"^\u{{FEFF}}?\s*[#*_]*[ \t]*{}(?:[ \t]*[*_]*:[*_]*[ \t]*|[*_]*[ \t]*(?:\r?\n|$))(?:[ \t]*\r?\n)*",
            regex::escape(phrase)
        );
        let leading = Regex::new(&pattern).map_err(|e| {
            ExtractorError::InvalidConfig(format!("sentinel '{sentinel}' is unusable: {e}"))
        })?;
        Ok(Self {
            leading: Some(leading),
        })
    }

    /// Remove the leading sentinel, if present. Everything else is returned
    /// unchanged.
    pub fn clean(&self, input: &str) -> String {
        match &self.leading {
            Some(re) => match re.find(input) {
                Some(m) => input[m.end()..].to_string(),
                None => input.to_string(),
            },
            None => input.to_string(),
        }
    }
}
