//! Domain values flowing through the pipeline.
//!
//! - [`Product`] - the item being ordered.
//! - [`Order`] - an order and its one-shot status state machine.
//! - [`Statistics`] - a combinable partial or total aggregate.
//! - [`Accumulator`] - the single mutex-guarded aggregate the reconciler
//!   folds into.

mod accumulator;
mod order;
mod product;
mod statistics;

#[cfg(test)]
mod tests;

pub use accumulator::*;
pub use order::*;
pub use product::*;
pub use statistics::*;

/// Rounds a monetary amount to two decimal places (half away from zero).
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
