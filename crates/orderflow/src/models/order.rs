use super::{Product, round_cents};
use crate::{Error, Result};
use core::fmt;
use uuid::Uuid;

/// Price charged per unit of product quantity.
pub const UNIT_PRICE: f64 = 10.5;

/// Orders whose total reaches this amount are completed; anything below is
/// rejected.
pub const COMPLETION_THRESHOLD: f64 = 500.0;

/// Lifecycle state of an [`Order`].
///
/// ```text
/// New --(total >= 500)--> Completed
/// New --(total <  500)--> Rejected
/// ```
///
/// `Completed` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderStatus {
    New,
    Rejected,
    Completed,
}

impl OrderStatus {
    /// Returns `true` once the status can no longer change.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::New)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Rejected => write!(f, "Rejected"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// A customer order.
///
/// The total is fixed at construction. The status moves from
/// [`OrderStatus::New`] to a terminal status exactly once; every other edge is
/// refused with [`Error::InvalidTransition`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct Order {
    id: String,
    product: Product,
    total: f64,
    status: OrderStatus,
}

impl Order {
    /// Creates a `New` order for `product` under a random (v4) UUID.
    pub fn new(product: Product) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), product)
    }

    /// Creates a `New` order under a caller-chosen ID.
    pub fn with_id(id: impl Into<String>, product: Product) -> Self {
        let total = order_total(product.quantity);
        Self {
            id: id.into(),
            product,
            total,
            status: OrderStatus::New,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn product(&self) -> &Product {
        &self.product
    }

    pub const fn total(&self) -> f64 {
        self.total
    }

    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Moves the order to [`OrderStatus::Completed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the order is already terminal.
    pub fn complete(&mut self) -> Result<()> {
        self.transition(OrderStatus::Completed)
    }

    /// Moves the order to [`OrderStatus::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the order is already terminal.
    pub fn reject(&mut self) -> Result<()> {
        self.transition(OrderStatus::Rejected)
    }

    /// Picks the terminal status from the total and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the order is already terminal.
    pub fn classify(&mut self) -> Result<OrderStatus> {
        if self.total < COMPLETION_THRESHOLD {
            self.reject()?;
        } else {
            self.complete()?;
        }
        Ok(self.status)
    }

    fn transition(&mut self, to: OrderStatus) -> Result<()> {
        if self.status.is_terminal() || !to.is_terminal() {
            return Err(Error::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Total price for `quantity` units, rounded to cents.
#[must_use]
pub fn order_total(quantity: u32) -> f64 {
    round_cents(f64::from(quantity) * UNIT_PRICE)
}
