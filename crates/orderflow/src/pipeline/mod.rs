//! The order-processing pipeline.
//!
//! ```text
//! create_order ──► ingestion ──► dispatcher ──► WorkerPool ──► worker 0..N
//!                                  │  (round-robin, bounded)        │
//!                                  ▼                                ▼
//!                              OrderStore             intermediate stats channel
//!                                                                   │
//!                                                                   ▼
//!                                              reconciler ──► Accumulator
//! ```
//!
//! ## Structure
//!
//! - [`config`] - [`PipelineConfig`] and its defaults.
//! - [`shutdown`] - the single-fire cancellation signal.
//! - [`progress`] - accepted/reconciled counters backing the drain signal.
//! - [`dispatcher`] - classifies orders and routes them to the pool.
//! - [`pool`] - round-robin hand-off from the dispatcher to the workers.
//! - [`worker`] - per-order statistics workers.
//! - [`reconciler`] - folds worker output into the aggregate.
//! - [`stats_service`] - owns the workers and the reconciler.
//! - [`repo`] - ingestion, dispatch, and the public entry points.

pub mod config;
pub mod dispatcher;
pub mod pool;
pub mod progress;
pub mod reconciler;
pub mod repo;
pub mod shutdown;
pub mod stats_service;
pub mod worker;


pub use config::*;
pub use pool::WorkerPool;
pub use progress::Progress;
pub use repo::Repo;
pub use shutdown::Shutdown;
pub use stats_service::StatsService;
