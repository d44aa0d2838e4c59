//! Round-robin hand-off from the dispatcher to the stats workers.
//!
//! This module defines the [`WorkerPool`] struct, the dispatcher-facing handle
//! onto the stats workers. Each worker listens on its own bounded
//! [`mpsc::Receiver`]; the pool distributes classified orders across them in
//! round-robin order and gives up as soon as the shared [`CancellationToken`]
//! fires.
//!
//! Per-worker queues keep the hand-off order predictable, but the dispatcher
//! waits on whichever worker is next even if another one is idle. With uneven
//! processing cost, a slow order can hold up the dispatcher while the rest of
//! the pool has room.

use crate::{Error, Order, Result};
use portable_atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Sending side of every stats worker's processed-order channel.
///
/// A full worker channel blocks the sender until the worker catches up or the
/// pipeline shuts down.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<Order>>,
    next_worker: AtomicUsize,
    shutdown_token: CancellationToken,
}

impl WorkerPool {
    /// Constructs a new [`WorkerPool`] from initialized worker channels and a
    /// shared cancellation token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `workers` is empty.
    pub fn new(
        workers: Vec<mpsc::Sender<Order>>,
        shutdown_token: CancellationToken,
    ) -> Result<Self> {
        if workers.is_empty() {
            return Err(Error::InvalidConfig {
                reason: "worker pool needs at least one worker".to_string(),
            });
        }

        Ok(Self {
            workers,
            next_worker: AtomicUsize::new(0),
            shutdown_token,
        })
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Returns the index of the next worker to receive work (round-robin).
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Sends a classified order to the next worker in the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pipeline is shutting down ([`Error::Closed`]), either before or
    ///   while waiting for room in the worker's channel.
    /// - The worker's channel is closed ([`Error::ChannelError`]).
    pub async fn send_to_next_worker(&self, order: Order) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::Closed);
        }

        let worker_idx = self.next_worker_index();
        let worker = &self.workers[worker_idx];

        tokio::select! {
            biased;
            () = self.shutdown_token.cancelled() => Err(Error::Closed),
            sent = worker.send(order) => sent.map_err(|_| Error::ChannelError {
                context: format!("Worker {worker_idx} channel closed"),
            }),
        }
    }
}
