use crate::{Error, Result};
use core::time::Duration;

/// Number of stats workers when none is configured.
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Tuning knobs for a [`Repo`](crate::Repo) and its
/// [`StatsService`](crate::StatsService).
///
/// Every buffer is bounded; a full buffer blocks the sender, which is how
/// backpressure travels from the reconciler back to `create_order`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of parallel stats workers.
    pub worker_count: usize,
    /// Capacity of the ingestion channel feeding the dispatcher.
    pub ingest_buffer: usize,
    /// Capacity of each worker's processed-order channel.
    pub processed_buffer: usize,
    /// Capacity of the intermediate statistics channel. `None` sizes it to
    /// `worker_count`.
    pub stats_buffer: Option<usize>,
    /// Simulated cost of computing one order's statistics.
    pub processing_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            ingest_buffer: 1,
            processed_buffer: 1,
            stats_buffer: None,
            processing_delay: Duration::ZERO,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    #[must_use]
    pub const fn with_ingest_buffer(mut self, ingest_buffer: usize) -> Self {
        self.ingest_buffer = ingest_buffer;
        self
    }

    #[must_use]
    pub const fn with_processed_buffer(mut self, processed_buffer: usize) -> Self {
        self.processed_buffer = processed_buffer;
        self
    }

    #[must_use]
    pub const fn with_stats_buffer(mut self, stats_buffer: usize) -> Self {
        self.stats_buffer = Some(stats_buffer);
        self
    }

    #[must_use]
    pub const fn with_processing_delay(mut self, processing_delay: Duration) -> Self {
        self.processing_delay = processing_delay;
        self
    }

    /// Effective capacity of the intermediate statistics channel.
    pub fn stats_capacity(&self) -> usize {
        self.stats_buffer.unwrap_or(self.worker_count)
    }

    /// Checks that every count and capacity is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("worker_count", self.worker_count),
            ("ingest_buffer", self.ingest_buffer),
            ("processed_buffer", self.processed_buffer),
            ("stats_buffer", self.stats_capacity()),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(Error::InvalidConfig {
                    reason: format!("{field} must be greater than 0"),
                });
            }
        }
        Ok(())
    }
}
