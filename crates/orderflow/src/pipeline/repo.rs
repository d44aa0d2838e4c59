//! Ingestion, dispatch, and the public entry points of the pipeline.
//!
//! [`Repo`] is the only thing callers talk to. It owns the ingestion channel,
//! the dispatcher task, the [`StatsService`] and the single-fire [`Shutdown`]
//! signal, and writes every order it accepts into the injected
//! [`OrderStore`].
//!
//! ## Shutdown
//!
//! - [`Repo::close`] raises the signal immediately. Orders still in flight
//!   may be dropped and never reach the aggregate.
//! - [`Repo::shutdown`] first waits for every accepted order to be
//!   reconciled, then raises the signal and joins every task.
//! - Dropping the `Repo` raises the signal if nobody did.

use crate::{
    Error, Order, OrderStore, PipelineConfig, Product, Progress, Result, Shutdown, Statistics,
    StatsService, pipeline::dispatcher::dispatch_loop,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

/// Entry point of the order pipeline.
///
/// Share it between callers behind an [`Arc`]; every method takes `&self`.
#[derive(Debug)]
pub struct Repo {
    orders: Arc<OrderStore>,
    stats: StatsService,
    incoming: mpsc::Sender<Order>,
    shutdown: Shutdown,
    progress: Arc<Progress>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl Repo {
    /// Validates `config`, spawns the stats service and the dispatcher, and
    /// returns a repo writing into `orders`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(orders: Arc<OrderStore>, config: PipelineConfig) -> Result<Self> {
        let shutdown = Shutdown::new();
        let progress = Arc::new(Progress::new());
        let stats = StatsService::new(&config, shutdown.token().clone(), Arc::clone(&progress))?;

        let (incoming, incoming_rx) = mpsc::channel(config.ingest_buffer);
        let dispatcher = tokio::spawn(dispatch_loop(
            incoming_rx,
            Arc::clone(&orders),
            stats.worker_pool(),
            shutdown.token().clone(),
        ));

        Ok(Self {
            orders,
            stats,
            incoming,
            shutdown,
            progress,
            dispatcher: Mutex::new(Some(dispatcher)),
        })
    }

    /// Creates a `New` order for `product` and hands it to the dispatcher.
    ///
    /// Waits for room in the ingestion channel. Once room is reserved the
    /// `New` order is written to the store and only then handed off, so the
    /// dispatcher's terminal write always lands after it.
    ///
    /// # Errors
    ///
    /// - [`Error::Closed`] if the shutdown signal is raised before the order is
    ///   accepted. Nothing is written to the store.
    /// - [`Error::ChannelError`] if the dispatcher has exited.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(product = %product.id, quantity = product.quantity)))]
    pub async fn create_order(&self, product: Product) -> Result<Order> {
        if self.shutdown.is_raised() {
            return Err(Error::Closed);
        }

        let order = Order::new(product);

        let permit = tokio::select! {
            biased;
            () = self.shutdown.raised() => return Err(Error::Closed),
            permit = self.incoming.reserve() => permit.map_err(|_| Error::ChannelError {
                context: "Dispatcher channel closed".to_owned(),
            })?,
        };

        self.orders.upsert(order.clone());
        self.progress.record_accepted();
        permit.send(order.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!("Accepted order {} ({:.2})", order.id(), order.total());

        Ok(order)
    }

    /// Returns the statistics reconciled so far.
    ///
    /// Provisional while orders are in flight; see [`Repo::drain`].
    pub fn get_order_stats(&self) -> Statistics {
        self.stats.get_stats()
    }

    /// Looks up the latest stored version of an order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown ID.
    pub fn find_order(&self, id: &str) -> Result<Order> {
        self.orders.find(id)
    }

    pub const fn orders(&self) -> &Arc<OrderStore> {
        &self.orders
    }

    pub const fn progress(&self) -> &Arc<Progress> {
        &self.progress
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_raised()
    }

    /// Raises the shutdown signal. Every task stops at its next wait; orders
    /// in flight may be lost.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the signal was already raised.
    pub fn close(&self) -> Result<()> {
        self.shutdown.raise()?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Shutdown raised with {} orders in flight",
            self.progress.in_flight()
        );

        Ok(())
    }

    /// Waits until every order accepted before this call has been reconciled
    /// and returns the aggregate at that point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the shutdown signal is raised first.
    pub async fn drain(&self) -> Result<Statistics> {
        let target = self.progress.accepted();

        #[cfg(feature = "tracing")]
        tracing::debug!("Draining {} in-flight orders", self.progress.in_flight());

        tokio::select! {
            biased;
            () = self.shutdown.raised() => Err(Error::Closed),
            reconciled = self.progress.wait_for_reconciled(target) => {
                reconciled?;
                Ok(self.get_order_stats())
            }
        }
    }

    /// Drains the pipeline, raises the shutdown signal and waits for every
    /// task to exit. Returns the final aggregate.
    ///
    /// Orders submitted concurrently with this call may or may not be
    /// included; stop submitting before calling it.
    ///
    /// # Errors
    ///
    /// - [`Error::Closed`] if the signal was raised before draining finished.
    /// - [`Error::AlreadyClosed`] if someone else raised it in between.
    pub async fn shutdown(&self) -> Result<Statistics> {
        let stats = self.drain().await?;
        self.close()?;
        self.join().await;

        #[cfg(feature = "tracing")]
        tracing::info!("Pipeline shut down: {stats:?}");

        Ok(stats)
    }

    /// Waits for the dispatcher and every stats task to exit.
    pub async fn join(&self) {
        let dispatcher = self.dispatcher.lock().take();
        if let Some(handle) = dispatcher {
            if let Err(_e) = handle.await {
                #[cfg(feature = "tracing")]
                tracing::error!("Dispatcher failed: {_e}");
            }
        }
        self.stats.join().await;
    }
}

impl Drop for Repo {
    fn drop(&mut self) {
        // Already raised is the normal case after `close` or `shutdown`.
        let _ = self.shutdown.raise();
    }
}
