//! Concurrent ID-keyed record store.
//!
//! [`Store`] maps a string ID to the latest version of a record. Upserts
//! replace the whole record; there is no partial update or merge. The store is
//! an owned value, shared between tasks through an [`Arc`](std::sync::Arc)
//! handed to whoever needs it.

use crate::{Error, Order, Product, Result};
use parking_lot::RwLock;
use std::collections::HashMap;


/// A value that can be kept in a [`Store`].
pub trait Record: Clone + Send + Sync + 'static {
    /// The key the record is stored under.
    fn id(&self) -> &str;
}

impl Record for Order {
    fn id(&self) -> &str {
        Order::id(self)
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Thread-safe map from ID to the most recently upserted record.
///
/// Safe for any number of concurrent readers and writers. A `find` racing an
/// `upsert` of the same ID sees either the old or the new record, never a mix.
#[derive(Debug)]
pub struct Store<R: Record> {
    records: RwLock<HashMap<String, R>>,
}

/// Store of orders, keyed by order ID.
pub type OrderStore = Store<Order>;

/// Store of products, keyed by product ID.
pub type ProductStore = Store<Product>;

impl<R: Record> Default for Store<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Record> Store<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, replacing whatever was previously kept under its ID.
    pub fn upsert(&self, record: R) {
        let id = record.id().to_owned();
        self.records.write().insert(id, record);
    }

    /// Returns a copy of the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing was ever upserted under `id`.
    pub fn find(&self, id: &str) -> Result<R> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound { id: id.to_owned() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copies out every record currently stored, in no particular order.
    pub fn snapshot(&self) -> Vec<R> {
        self.records.read().values().cloned().collect()
    }
}
