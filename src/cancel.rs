//! Cooperative cancellation for long builds.
//!
//! Boolean solid construction can run for minutes at high block counts.
//! Builders check a [`CancelToken`] between independent unit builds
//! (monoblocks within a PFU, replicas within a target) and abort with
//! [`BuildError::Cancelled`](crate::errors::BuildError::Cancelled) once it
//! has been tripped. Nothing is checked inside a single kernel operation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::BuildError;

/// A cheaply clonable cancellation flag shared between the caller and a
/// running build.
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

    /// Returns `Err(BuildError::Cancelled)` once the token has been tripped.
    pub fn checkpoint(&self) -> Result<(), BuildError> {
        if self.is_cancelled() {
            Err(BuildError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_passes_until_cancelled() {
        let token = CancelToken::new();
        assert!(token.checkpoint().is_ok());
        token.cancel();
        assert_eq!(token.checkpoint(), Err(BuildError::Cancelled));
        // further checks keep failing
        assert!(token.checkpoint().is_err());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
    }
}
