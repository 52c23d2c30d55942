//! Cooperative cancellation flag.
//!
//! The run loop checks the token at timestep starts and at internal phase
//! boundaries (never mid-cell, never mid-dispersal-phase).  Cancellation is a
//! signal, not an error: an in-flight timestep is neither rolled back nor
//! rushed — the loop simply does not start the next unit of work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable cancellation handle shared between the run loop and its host.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.  Idempotent; safe from any thread.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// `true` once [`cancel`][Self::cancel] has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
