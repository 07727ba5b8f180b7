//! Cooperative cancellation shared between a caller and an in-flight query or build.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{ExpertiseError, ExpertiseResult};

/// Cloneable cancellation flag. Checked between pipeline stages and before
/// every outbound service attempt; never interrupts a call already on the wire.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
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

    /// Return `Err(Cancelled)` if cancellation was requested.
    pub fn check(&self, stage: &str) -> ExpertiseResult<()> {
        if self.is_cancelled() {
            return Err(ExpertiseError::Cancelled {
                stage: stage.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check("scoring").is_ok());
        other.cancel();
        assert!(token.is_cancelled());
        let err = token.check("scoring").unwrap_err();
        assert!(err.to_string().contains("scoring"));
    }
}
