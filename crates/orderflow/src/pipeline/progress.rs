//! Accepted/reconciled counters backing the drain signal.
//!
//! Every order handed to the dispatcher bumps `accepted`; every per-order
//! [`Statistics`](crate::Statistics) folded by the reconciler bumps
//! `reconciled`. The pipeline is drained once `reconciled` catches up with the
//! `accepted` value sampled by the waiter.

use crate::{Error, Result};
use portable_atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

#[derive(Debug)]
pub struct Progress {
    accepted: AtomicU64,
    reconciled: watch::Sender<u64>,
}

impl Default for Progress {
    fn default() -> Self {
        let (reconciled, _) = watch::channel(0);
        Self {
            accepted: AtomicU64::new(0),
            reconciled,
        }
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::AcqRel);
    }

    pub fn record_reconciled(&self) {
        self.reconciled.send_modify(|n| *n += 1);
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Acquire)
    }

    pub fn reconciled(&self) -> u64 {
        *self.reconciled.borrow()
    }

    /// Number of accepted orders not yet reconciled.
    pub fn in_flight(&self) -> u64 {
        self.accepted().saturating_sub(self.reconciled())
    }

    /// Waits until at least `target` orders have been reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelError`] if the counter is dropped while waiting.
    pub async fn wait_for_reconciled(&self, target: u64) -> Result<()> {
        let mut rx = self.reconciled.subscribe();
        rx.wait_for(|&n| n >= target)
            .await
            .map(|_| ())
            .map_err(|e| Error::ChannelError {
                context: format!("Reconciled counter dropped: {e}"),
            })
    }
}
