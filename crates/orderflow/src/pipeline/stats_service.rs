//! Stats worker pool and reconciler.
//!
//! [`StatsService`] spawns `worker_count` [`worker_loop`] tasks and a single
//! [`reconcile_loop`] task. Workers fan in through one bounded intermediate
//! channel whose capacity defaults to the worker count, so a reconciler that
//! falls behind stalls the workers, which in turn stall the dispatcher.

use crate::{
    Accumulator, PipelineConfig, Progress, Result, Statistics, WorkerPool,
    pipeline::{reconciler::reconcile_loop, worker::worker_loop},
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Owner of the stats workers, the reconciler, and the aggregate they build.
#[derive(Debug)]
pub struct StatsService {
    pub(super) result: Arc<Accumulator>,
    progress: Arc<Progress>,
    worker_pool: Arc<WorkerPool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl StatsService {
    /// Spawns the workers and the reconciler.
    ///
    /// Each worker gets its own processed-order channel of
    /// `config.processed_buffer` slots; the returned service hands out the
    /// sending halves through [`StatsService::worker_pool`]. Every task stops
    /// when `shutdown_token` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    /// `config` fails validation. Nothing is spawned in that case.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(
        config: &PipelineConfig,
        shutdown_token: CancellationToken,
        progress: Arc<Progress>,
    ) -> Result<Self> {
        config.validate()?;

        let result = Arc::new(Accumulator::new());
        let (stats_tx, stats_rx) = mpsc::channel(config.stats_capacity());

        let mut workers = Vec::with_capacity(config.worker_count);
        let mut tasks = Vec::with_capacity(config.worker_count + 1);

        for worker_id in 0..config.worker_count {
            let (tx, rx) = mpsc::channel(config.processed_buffer);
            workers.push(tx);

            tasks.push(tokio::spawn(worker_loop(
                worker_id,
                rx,
                stats_tx.clone(),
                shutdown_token.clone(),
                config.processing_delay,
            )));
        }
        // Only the workers hold senders now, so the reconciler sees the
        // channel close once they have all exited.
        drop(stats_tx);

        tasks.push(tokio::spawn(reconcile_loop(
            stats_rx,
            Arc::clone(&result),
            Arc::clone(&progress),
            shutdown_token.clone(),
        )));

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Stats service started with {} workers (stats buffer {})",
            config.worker_count,
            config.stats_capacity()
        );

        Ok(Self {
            result,
            progress,
            worker_pool: Arc::new(WorkerPool::new(workers, shutdown_token)?),
            tasks: Mutex::new(tasks),
        })
    }

    /// Returns the reconciled aggregate so far.
    ///
    /// This is a snapshot: orders still moving through the pipeline are not
    /// included. Wait for [`Progress`] to catch up before treating it as a
    /// final total.
    pub fn get_stats(&self) -> Statistics {
        self.result.get()
    }

    /// Handle the dispatcher uses to feed the workers.
    pub fn worker_pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.worker_pool)
    }

    pub const fn progress(&self) -> &Arc<Progress> {
        &self.progress
    }

    /// Waits for every worker and the reconciler to exit.
    ///
    /// Tasks only exit once the shutdown token fires (or their channels
    /// close), so call this after raising the signal. Subsequent calls return
    /// immediately.
    pub async fn join(&self) {
        let tasks = core::mem::take(&mut *self.tasks.lock());

        for joined in futures::future::join_all(tasks).await {
            if let Err(_e) = joined {
                #[cfg(feature = "tracing")]
                tracing::error!("Stats task failed: {_e}");
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Stats service stopped");
    }
}
