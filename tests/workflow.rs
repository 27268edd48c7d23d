//! Workflow tests: session + exporter driven through a scripted service.
//!
//! No network is involved; the service double answers from a queue and
//! counts how often it was called.

use async_trait::async_trait;
use req_extractor::{
    build_document, write_artifact, DocumentBlock, ExtractionResult, ExtractionService,
    ExtractionSession, ExtractorConfig, ExtractorError, HeadingLevel, SessionObserver,
    SharedSession, UploadCandidate, ValidationError, PDF_MIME,
};
use std::collections::VecDeque;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Answers from a queue of `(status, body)` pairs after an optional delay.
struct ScriptedService {
    replies: Mutex<VecDeque<(u16, &'static str)>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedService {
    fn new(replies: &[(u16, &'static str)]) -> Arc<Self> {
        Self::with_delay(replies, Duration::ZERO)
    }

    fn with_delay(replies: &[(u16, &'static str)], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().copied().collect()),
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionService for ScriptedService {
    async fn extract(&self, candidate: &UploadCandidate) -> Result<String, ExtractorError> {
        assert_eq!(candidate.mime_type(), PDF_MIME, "only PDFs may reach the service");
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let (status, body) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected extra request");
        if (200..300).contains(&status) {
            Ok(body.to_string())
        } else {
            Err(ExtractorError::HttpStatus { status })
        }
    }
}

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl SessionObserver for EventLog {
    fn on_submit_start(&self, name: &str, bytes: usize) {
        self.0.lock().unwrap().push(format!("start {name} {bytes}"));
    }
    fn on_submit_complete(&self, text_len: usize) {
        self.0.lock().unwrap().push(format!("complete {text_len}"));
    }
    fn on_submit_failed(&self, message: &str) {
        self.0.lock().unwrap().push(format!("failed {message}"));
    }
}

fn pdf(name: &str) -> UploadCandidate {
    UploadCandidate::new(b"%PDF-1.4 test".to_vec(), PDF_MIME, name)
}

fn shared(service: Arc<ScriptedService>, config: ExtractorConfig) -> SharedSession {
    SharedSession::new(ExtractionSession::new(config).unwrap(), service)
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_success() {
    let service = ScriptedService::new(&[(200, "# Req\n- item1\n- item2")]);
    let session = shared(service.clone(), ExtractorConfig::default());

    session.select_file(pdf("srs.pdf")).unwrap();
    let result = session.submit().await;

    assert_eq!(
        result,
        ExtractionResult::Succeeded {
            text: "# Req\n- item1\n- item2".into()
        }
    );
    assert_eq!(
        build_document(result.text().unwrap()),
        vec![
            DocumentBlock::Heading {
                level: HeadingLevel::H1,
                text: "Req".into()
            },
            DocumentBlock::BulletItem {
                text: "item1".into()
            },
            DocumentBlock::BulletItem {
                text: "item2".into()
            },
        ]
    );
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn failure_then_resubmit() {
    let service = ScriptedService::new(&[(500, "boom"), (200, "- Req 1")]);
    let session = shared(service.clone(), ExtractorConfig::default());
    session.select_file(pdf("srs.pdf")).unwrap();

    let first = session.submit().await;
    assert!(matches!(first, ExtractionResult::Failed { .. }));
    assert!(session.affordances().can_submit);
    assert!(!session.affordances().can_download);
    assert!(session.export().unwrap().is_none());

    let second = session.submit().await;
    assert_eq!(second.text(), Some("- Req 1"));
    assert_eq!(service.calls(), 2);
}

#[tokio::test]
async fn concurrent_submits_issue_one_request() {
    let service = ScriptedService::with_delay(&[(200, "# Done")], Duration::from_millis(50));
    let a = shared(service.clone(), ExtractorConfig::default());
    let b = a.clone();
    a.select_file(pdf("srs.pdf")).unwrap();

    let (ra, rb) = tokio::join!(a.submit(), b.submit());

    assert_eq!(service.calls(), 1);
    assert_eq!(ra.text(), Some("# Done"));
    assert_eq!(rb, ExtractionResult::Pending);
    assert_eq!(a.result().text(), Some("# Done"));
}

#[tokio::test]
async fn submit_without_candidate_sends_nothing() {
    let service = ScriptedService::new(&[]);
    let session = shared(service.clone(), ExtractorConfig::default());

    assert_eq!(session.submit().await, ExtractionResult::Empty);
    assert_eq!(session.validation_error(), Some(ValidationError::NoFile));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn rejected_file_never_reaches_service() {
    let service = ScriptedService::new(&[]);
    let session = shared(service.clone(), ExtractorConfig::default());

    session.begin_drag();
    let txt = UploadCandidate::new(b"hi".to_vec(), "text/plain", "notes.txt");
    assert!(session.drop_file([txt]).is_err());
    assert!(!session.affordances().is_dragging);

    session.submit().await;
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn hung_request_times_out() {
    let service = ScriptedService::with_delay(&[(200, "late")], Duration::from_secs(10));
    let config = ExtractorConfig::builder()
        .request_timeout_secs(1)
        .build()
        .unwrap();
    let session = shared(service, config);
    session.select_file(pdf("srs.pdf")).unwrap();

    let result = session.submit().await;
    assert_eq!(
        result,
        ExtractionResult::Failed {
            message: "Failed to process PDF".into()
        }
    );
    assert!(session.affordances().can_submit);
}

#[tokio::test]
async fn observer_sees_start_and_outcome() {
    let service = ScriptedService::new(&[(200, "Generated Requirements: - Req 1\n- Req 2"), (503, "")]);
    let log = Arc::new(EventLog::default());
    let session = shared(service, ExtractorConfig::default()).with_observer(log.clone());
    session.select_file(pdf("srs.pdf")).unwrap();

    assert_eq!(session.submit().await.text(), Some("- Req 1\n- Req 2"));
    session.submit().await;

    assert_eq!(
        *log.0.lock().unwrap(),
        vec![
            "start srs.pdf 13".to_string(),
            "complete 15".to_string(),
            "start srs.pdf 13".to_string(),
            "failed Failed to process PDF".to_string(),
        ]
    );
}

#[tokio::test]
async fn stale_result_survives_new_selection() {
    let service = ScriptedService::new(&[(200, "# First")]);
    let session = shared(service, ExtractorConfig::default());
    session.select_file(pdf("one.pdf")).unwrap();
    session.submit().await;

    session.select_file(pdf("two.pdf")).unwrap();
    let aff = session.affordances();
    assert_eq!(aff.selected_file.as_deref(), Some("two.pdf"));
    assert!(aff.can_download);
    assert_eq!(session.result().text(), Some("# First"));
}

#[tokio::test]
async fn exported_document_reaches_disk() {
    let service = ScriptedService::new(&[(200, "# Login\n\n## Auth\n- Users log in\n* Reset password\nPlain text")]);
    let session = shared(service, ExtractorConfig::default());
    session.select_file(pdf("srs.pdf")).unwrap();
    session.submit().await;

    let artifact = session.export().unwrap().expect("artifact after success");
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(&artifact, dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "requirements.docx");

    let file = std::fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let order: Vec<usize> = [
        "Extracted Requirements",
        "Login",
        "Auth",
        "Users log in",
        "Reset password",
        "Plain text",
    ]
    .iter()
    .map(|needle| xml.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order: {order:?}");
}

#[test]
fn arbitrary_text_degrades_to_paragraphs() {
    let text = "<html>\n{\"json\": true}\n\tTabbed\n#not-heading";
    let blocks = build_document(text);
    assert_eq!(blocks.len(), 4);
    assert!(blocks
        .iter()
        .all(|b| matches!(b, DocumentBlock::Paragraph { .. })));
}
