use super::{Order, OrderStatus, round_cents};
use core::iter::Sum;
use core::ops::Add;

/// Order counts and revenue for some subset of processed orders.
///
/// A single worker produces one `Statistics` per order; the reconciler folds
/// them together with [`Statistics::combine`]. Serialized field names are
/// `CompletedOrders`, `RejectedOrders` and `Revenue`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "PascalCase")
)]
pub struct Statistics {
    pub completed_orders: u64,
    pub rejected_orders: u64,
    pub revenue: f64,
}

impl Statistics {
    pub const ZERO: Self = Self {
        completed_orders: 0,
        rejected_orders: 0,
        revenue: 0.0,
    };

    /// Statistics for a single completed order worth `revenue`.
    pub const fn completed(revenue: f64) -> Self {
        Self {
            completed_orders: 1,
            rejected_orders: 0,
            revenue,
        }
    }

    /// Statistics for a single rejected order.
    pub const fn rejected() -> Self {
        Self {
            completed_orders: 0,
            rejected_orders: 1,
            revenue: 0.0,
        }
    }

    /// Per-order contribution of a classified order.
    ///
    /// Anything that is not [`OrderStatus::Completed`] counts as rejected.
    pub const fn from_order(order: &Order) -> Self {
        match order.status() {
            OrderStatus::Completed => Self::completed(order.total()),
            OrderStatus::Rejected | OrderStatus::New => Self::rejected(),
        }
    }

    /// Folds two aggregates together. Counts add; revenue is summed and
    /// rounded to cents.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            completed_orders: self.completed_orders + other.completed_orders,
            rejected_orders: self.rejected_orders + other.rejected_orders,
            revenue: round_cents(self.revenue + other.revenue),
        }
    }

    /// Number of orders this aggregate accounts for.
    pub const fn total_orders(&self) -> u64 {
        self.completed_orders + self.rejected_orders
    }
}

impl Add for Statistics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(rhs)
    }
}

impl Sum for Statistics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::combine)
    }
}
