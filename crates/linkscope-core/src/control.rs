//! Cooperative cancellation for in-flight resolutions.
//!
//! A `CancelToken` is handed to the resolver by whoever started the resolution.
//! The resolver checks it before every hop and the probe polls it during a
//! transfer, so an abandoned resolution stops issuing requests promptly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Error returned when a probe stops because its token was cancelled.
#[derive(Debug)]
pub struct ResolutionAborted;

impl std::fmt::Display for ResolutionAborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resolution cancelled by caller")
    }
}

impl std::error::Error for ResolutionAborted {}

/// Shared cancellation flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(ResolutionAborted)` once cancelled.
    pub fn check(&self) -> Result<(), ResolutionAborted> {
        if self.is_cancelled() {
            Err(ResolutionAborted)
        } else {
            Ok(())
        }
    }
}
