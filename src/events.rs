//! Observer callbacks for submission events.
//!
//! Install an [`Arc<dyn SessionObserver>`] on a
//! [`crate::session::SharedSession`] to hear when a submission starts and
//! how it ends. The CLI uses this to drive a spinner; a GUI could toggle its
//! "Processing..." label the same way.
//!
//! # Example
//!
//! ```rust
//! use req_extractor::SessionObserver;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter(AtomicUsize);
//!
//! impl SessionObserver for Counter {
//!     fn on_submit_start(&self, name: &str, bytes: usize) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("uploading {name} ({bytes} bytes)");
//!     }
//! }
//! ```

use std::sync::Arc;

/// Called by the session around each submission.
///
/// All methods default to no-ops. Callbacks run on whichever task drives
/// the submission, outside the session lock, so they may safely query the
/// session.
pub trait SessionObserver: Send + Sync {
    /// A submission moved the session to `Pending`.
    fn on_submit_start(&self, name: &str, bytes: usize) {
        let _ = (name, bytes);
    }

    /// The service answered; `text_len` is the cleaned markdown length.
    fn on_submit_complete(&self, text_len: usize) {
        let _ = text_len;
    }

    /// The submission failed; `message` is the user-facing text.
    fn on_submit_failed(&self, message: &str) {
        let _ = message;
    }
}

/// Shared observer handle.
pub type Observer = Arc<dyn SessionObserver>;

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl SessionObserver for Recorder {
        fn on_submit_start(&self, name: &str, _bytes: usize) {
            self.0.lock().unwrap().push(format!("start:{name}"));
        }
        fn on_submit_failed(&self, message: &str) {
            self.0.lock().unwrap().push(format!("failed:{message}"));
        }
    }

    #[test]
    fn default_methods_are_noops() {
        let obs: Observer = Arc::new(NoopObserver);
        obs.on_submit_start("a.pdf", 10);
        obs.on_submit_complete(5);
        obs.on_submit_failed("x");
    }

    #[test]
    fn overridden_methods_fire() {
        let rec = Arc::new(Recorder::default());
        let obs: Observer = rec.clone();
        obs.on_submit_start("a.pdf", 10);
        obs.on_submit_complete(3);
        obs.on_submit_failed("boom");
        assert_eq!(*rec.0.lock().unwrap(), vec!["start:a.pdf", "failed:boom"]);
    }
}
