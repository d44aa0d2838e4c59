//! Single-fire shutdown signal shared by every pipeline task.

use crate::{Error, Result};
use portable_atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Broadcast-once cancellation signal.
///
/// Wraps a [`CancellationToken`] that every task selects on alongside its main
/// wait, and guards [`Shutdown::raise`] with a compare-and-swap flag so the
/// signal can be raised at most once. Clones share the same signal.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    token: CancellationToken,
    raised: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token tasks observe. Cancelling it directly bypasses the
    /// single-fire guard, so only hand it to tasks that listen.
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Raises the signal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the signal was raised before. The
    /// second call has no other effect.
    pub fn raise(&self) -> Result<()> {
        if self
            .raised
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyClosed);
        }
        self.token.cancel();
        Ok(())
    }

    pub fn is_raised(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal has been raised.
    pub fn raised(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
