use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::SearchError;

/// Cooperative cancellation for long-running searches.
///
/// Clones share the same flag, so a handle kept by the caller can stop a search
/// running on another thread. The engine polls [`Cancellation::check`] between
/// source peaks.
#[derive(Debug, Clone)]
pub struct Cancellation {
    started: Instant,
    deadline: Option<Instant>,
    flag: Arc<AtomicBool>,
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation {
    /// A token that never fires unless [`cancel`](Self::cancel) is called
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            deadline: None,
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fire once `timeout` has elapsed from now
    pub fn with_timeout(timeout: Duration) -> Self {
        let mut token = Self::new();
        token.deadline = token.started.checked_add(timeout);
        token
    }

    /// Fire at an absolute instant
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::new()
        }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err` once cancelled or past the deadline
    pub fn check(&self) -> Result<(), SearchError> {
        if self.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(SearchError::DeadlineExceeded(now - self.started));
            }
        }
        Ok(())
    }
}
