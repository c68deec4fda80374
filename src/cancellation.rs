//! Explicit cancellation signal threaded through the adapter core.
//!
//! The host may ask to stop a run at any time, from any thread. The token is
//! checked at well-defined points: before engine invocation, after filter
//! resolution, and before run-report generation. Because the engine may be
//! mid-call when cancellation is requested, an engine fault observed while
//! the token is set is the expected signal of a successful stop, not an
//! error (see the orchestrator).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation signal.
///
/// Clones share the same flag; once cancelled, a token stays cancelled for
/// its lifetime.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_flag() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());

        token.cancel();
        assert!(observer.is_cancelled());

        // Idempotent.
        token.cancel();
        assert!(token.is_cancelled());
    }
}
