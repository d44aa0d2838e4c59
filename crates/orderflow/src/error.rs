//! Error types for the order pipeline.
//!
//! This module defines the central `Error` enum, which captures every failure
//! the pipeline reports to its callers. Nothing inside the pipeline retries:
//! each variant is handed straight back to whoever made the call.
//!
//! ## Error Cases
//! - `Closed`: A mutating call arrived after the shutdown signal was raised.
//! - `AlreadyClosed`: The shutdown signal was raised a second time.
//! - `NotFound`: A store lookup missed.
//! - `InvalidTransition`: An order status edge outside the state machine.
//! - `InvalidConfig`: A [`PipelineConfig`](crate::PipelineConfig) failed
//!   validation.
//! - `ChannelError`: An internal channel closed because its task exited.

use crate::models::OrderStatus;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the order pipeline.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The pipeline has been shut down and no longer accepts work.
    #[error("Orders app is closed, try again later")]
    Closed,

    /// `close` was called after the shutdown signal had already been raised.
    #[error("Shutdown signal was already raised")]
    AlreadyClosed,

    /// No record is stored under the requested ID.
    #[error("No record found for id {id}")]
    NotFound { id: String },

    /// The requested status change is not an edge of the order state machine.
    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The pipeline configuration is unusable.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Internal channel send/receive failure (e.g., the receiving task exited).
    #[error("Channel error: {context}")]
    ChannelError { context: String },
}
