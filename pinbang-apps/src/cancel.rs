//! Cooperative cancellation for the demo loops

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag
///
/// Clones observe the same flag. A signal handler (or any other thread)
/// calls [`cancel`](Self::cancel); loops poll [`is_cancelled`](Self::is_cancelled)
/// between display updates and return once it is set. A transfer that is
/// already on the wire always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every loop holding this token to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
