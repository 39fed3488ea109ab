//! Fake: test double for user-agent classification.
//!
//! [`FakeClassifier`] returns canned labels without a regex database, counts
//! its calls, and can be made slow or failing to exercise the pipeline's
//! drop and error paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::fallback::UserAgentClassifier;
use super::model::{ClassifyError, UaLabels};

pub struct FakeClassifier {
    labels: UaLabels,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn new(user_agent: &str, os: &str, device: &str) -> Self {
        Self {
            labels: UaLabels::new(user_agent, os, device),
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Block the calling thread this long on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("", "", "")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UserAgentClassifier for FakeClassifier {
    fn classify(&self, _user_agent: &str) -> Result<UaLabels, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.fail {
            return Err(ClassifyError::ClassifierUnavailable("fake classifier failure".to_string()));
        }

        Ok(self.labels.clone())
    }
}
