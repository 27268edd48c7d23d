//! The extraction session: file selection, submission and result lifecycle.
//!
//! [`ExtractionSession`] is a plain state machine. Every transition takes its
//! input explicitly (the candidate, the drop list, the service outcome), so
//! it runs the same under a CLI, a GUI event loop or a unit test.
//!
//! ## Submission protocol
//!
//! A submission is split in two halves so the slow part never happens while
//! the session is borrowed or locked:
//!
//! ```text
//! begin_submission() ──▶ Submission ticket ──▶ service.extract() ──▶ complete_submission()
//!   Empty/Failed/…          (id, candidate)        (await)              Succeeded | Failed
//!   ──▶ Pending
//! ```
//!
//! `begin_submission` refuses while a submission is pending, which is the
//! only reentrancy guard needed: at most one request is ever in flight.
//! [`SharedSession`] wraps the state machine for callers that submit from
//! several tasks.

use crate::candidate::UploadCandidate;
use crate::cleanup::ResponseCleaner;
use crate::config::ExtractorConfig;
use crate::error::{ExtractorError, ValidationError};
use crate::events::Observer;
use crate::export::{export_markdown, Artifact};
use crate::service::ExtractionService;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Label of the submit control while idle.
pub const SUBMIT_LABEL: &str = "Extract Requirements";

/// Label of the submit control while a request is in flight.
pub const PENDING_LABEL: &str = "Processing...";

/// Outcome of the most recent submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// Nothing submitted yet.
    #[default]
    Empty,
    /// A request is in flight.
    Pending,
    /// The service answered; `text` is the cleaned markdown.
    Succeeded { text: String },
    /// The request failed; `message` is safe to show to users.
    Failed { message: String },
}

impl ExtractionResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, ExtractionResult::Pending)
    }

    /// The markdown text, if the last submission succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractionResult::Succeeded { text } => Some(text),
            _ => None,
        }
    }
}

/// Proof that a submission was started; hand it back on completion.
#[derive(Debug, Clone)]
pub struct Submission {
    id: u64,
    candidate: UploadCandidate,
}

impl Submission {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn candidate(&self) -> &UploadCandidate {
        &self.candidate
    }
}

/// What the presentation layer should enable or show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordances {
    /// A PDF is staged and nothing is pending.
    pub can_submit: bool,
    /// A successful result is available for export.
    pub can_download: bool,
    pub is_dragging: bool,
    pub submit_label: &'static str,
    /// Display name of the staged file.
    pub selected_file: Option<String>,
    /// Inline message: the validation error, else the extraction failure.
    pub error: Option<String>,
}

/// Single-writer state machine for one extraction workflow.
#[derive(Debug)]
pub struct ExtractionSession {
    config: ExtractorConfig,
    cleaner: ResponseCleaner,
    candidate: Option<UploadCandidate>,
    result: ExtractionResult,
    drag_active: bool,
    validation_error: Option<ValidationError>,
    next_submission: u64,
    pending: Option<u64>,
}

impl ExtractionSession {
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        let cleaner = ResponseCleaner::new(&config.sentinel)?;
        Ok(Self {
            config,
            cleaner,
            candidate: None,
            result: ExtractionResult::Empty,
            drag_active: false,
            validation_error: None,
            next_submission: 1,
            pending: None,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn candidate(&self) -> Option<&UploadCandidate> {
        self.candidate.as_ref()
    }

    pub fn result(&self) -> &ExtractionResult {
        &self.result
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    // ── Selection ────────────────────────────────────────────────────────

    /// Stage `input` if it is a PDF.
    ///
    /// On success the previous candidate is replaced and the validation error
    /// cleared; a stale result from an earlier file stays visible until the
    /// next submission. On failure nothing but the validation error changes.
    pub fn select_file(&mut self, input: UploadCandidate) -> Result<(), ValidationError> {
        if !input.is_pdf() {
            let err = ValidationError::NotAPdf {
                name: input.name().to_string(),
                mime_type: input.mime_type().to_string(),
            };
            debug!("Rejected '{}': {}", input.name(), input.mime_type());
            self.validation_error = Some(err.clone());
            return Err(err);
        }
        self.stage(input);
        Ok(())
    }

    pub fn begin_drag(&mut self) {
        self.drag_active = true;
    }

    pub fn end_drag(&mut self) {
        self.drag_active = false;
    }

    /// Stage the first file of a drop. Extra files are ignored.
    pub fn drop_file<I>(&mut self, inputs: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = UploadCandidate>,
    {
        self.drag_active = false;
        match inputs.into_iter().next() {
            Some(first) if first.is_pdf() => {
                self.stage(first);
                Ok(())
            }
            other => {
                if let Some(c) = other {
                    debug!("Rejected dropped '{}': {}", c.name(), c.mime_type());
                }
                self.validation_error = Some(ValidationError::NotAPdfDrop);
                Err(ValidationError::NotAPdfDrop)
            }
        }
    }

    /// Clear the validation error. Candidate and result are kept.
    pub fn reset(&mut self) {
        self.validation_error = None;
    }

    fn stage(&mut self, input: UploadCandidate) {
        debug!("Staged '{}' ({} bytes)", input.name(), input.len());
        self.candidate = Some(input);
        self.validation_error = None;
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Move to `Pending` and hand out a ticket for the request.
    ///
    /// Returns `None` without side effects while a submission is pending,
    /// and `None` with a [`ValidationError::NoFile`] when nothing is staged.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        if self.pending.is_some() {
            debug!("Submit ignored: a submission is already pending");
            return None;
        }
        let Some(candidate) = self.candidate.clone() else {
            self.validation_error = Some(ValidationError::NoFile);
            return None;
        };

        let id = self.next_submission;
        self.next_submission += 1;
        self.pending = Some(id);
        self.validation_error = None;
        self.result = ExtractionResult::Pending;

        info!("Submission #{id}: '{}'", candidate.name());
        Some(Submission { id, candidate })
    }

    /// Record the outcome of `submission`.
    ///
    /// Returns `false` (and changes nothing) if the ticket does not belong to
    /// the pending submission.
    pub fn complete_submission(
        &mut self,
        submission: &Submission,
        outcome: Result<String, ExtractorError>,
    ) -> bool {
        if self.pending != Some(submission.id) {
            warn!("Ignoring completion of stale submission #{}", submission.id);
            return false;
        }
        self.pending = None;

        self.result = match outcome {
            Ok(body) => {
                let text = self.cleaner.clean(&body);
                info!("Submission #{} succeeded: {} bytes of markdown", submission.id, text.len());
                ExtractionResult::Succeeded { text }
            }
            Err(e) => {
                warn!("Submission #{} failed: {e}", submission.id);
                ExtractionResult::Failed {
                    message: self.config.failure_message.clone(),
                }
            }
        };
        true
    }

    /// Submit the staged file and wait for the outcome.
    ///
    /// A no-op while pending or with nothing staged; in both cases the
    /// current result is returned unchanged.
    pub async fn submit(&mut self, service: &dyn ExtractionService) -> &ExtractionResult {
        if let Some(submission) = self.begin_submission() {
            let outcome =
                request(service, submission.candidate(), self.config.request_timeout()).await;
            self.complete_submission(&submission, outcome);
        }
        &self.result
    }

    // ── Export / presentation ────────────────────────────────────────────

    /// Build the Word document for a successful result.
    ///
    /// `Ok(None)` for `Empty`, `Pending` and `Failed`.
    pub fn export(&self) -> Result<Option<Artifact>, ExtractorError> {
        match self.result.text() {
            Some(text) => export_markdown(text, &self.config).map(Some),
            None => Ok(None),
        }
    }

    pub fn affordances(&self) -> Affordances {
        let pending = self.result.is_pending();
        let error = match (&self.validation_error, &self.result) {
            (Some(v), _) => Some(v.to_string()),
            (None, ExtractionResult::Failed { message }) => Some(message.clone()),
            _ => None,
        };
        Affordances {
            can_submit: self.candidate.is_some() && !pending,
            can_download: self.result.text().is_some(),
            is_dragging: self.drag_active,
            submit_label: if pending { PENDING_LABEL } else { SUBMIT_LABEL },
            selected_file: self.candidate.as_ref().map(|c| c.name().to_string()),
            error,
        }
    }
}

/// Run one extraction request, bounded by `timeout` when set.
async fn request(
    service: &dyn ExtractionService,
    candidate: &UploadCandidate,
    timeout: Option<Duration>,
) -> Result<String, ExtractorError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, service.extract(candidate))
            .await
            .unwrap_or_else(|_| {
                Err(ExtractorError::Timeout {
                    secs: limit.as_secs(),
                })
            }),
        None => service.extract(candidate).await,
    }
}

// ── Shared session ───────────────────────────────────────────────────────

/// Cloneable handle to a session plus the service it submits to.
///
/// The lock is held only for state transitions, never across the request,
/// so `submit` may be called from any number of tasks: all but the first
/// caller see the pending result and return immediately.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<ExtractionSession>>,
    service: Arc<dyn ExtractionService>,
    observer: Option<Observer>,
}

impl SharedSession {
    pub fn new(session: ExtractionSession, service: Arc<dyn ExtractionService>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            service,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ExtractionSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn select_file(&self, input: UploadCandidate) -> Result<(), ValidationError> {
        self.lock().select_file(input)
    }

    pub fn drop_file<I>(&self, inputs: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = UploadCandidate>,
    {
        self.lock().drop_file(inputs)
    }

    pub fn begin_drag(&self) {
        self.lock().begin_drag();
    }

    pub fn end_drag(&self) {
        self.lock().end_drag();
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Snapshot of the current result.
    pub fn result(&self) -> ExtractionResult {
        self.lock().result().clone()
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.lock().validation_error().cloned()
    }

    pub fn affordances(&self) -> Affordances {
        self.lock().affordances()
    }

    pub fn export(&self) -> Result<Option<Artifact>, ExtractorError> {
        self.lock().export()
    }

    /// Submit the staged file and return the resulting state.
    pub async fn submit(&self) -> ExtractionResult {
        let (submission, timeout) = {
            let mut session = self.lock();
            let timeout = session.config().request_timeout();
            match session.begin_submission() {
                Some(s) => (s, timeout),
                None => return session.result().clone(),
            }
        };

        if let Some(obs) = &self.observer {
            obs.on_submit_start(submission.candidate().name(), submission.candidate().len());
        }

        let outcome = request(self.service.as_ref(), submission.candidate(), timeout).await;

        let result = {
            let mut session = self.lock();
            session.complete_submission(&submission, outcome);
            session.result().clone()
        };

        if let Some(obs) = &self.observer {
            match &result {
                ExtractionResult::Succeeded { text } => obs.on_submit_complete(text.len()),
                ExtractionResult::Failed { message } => obs.on_submit_failed(message),
                _ => {}
            }
        }
        result
    }
}
