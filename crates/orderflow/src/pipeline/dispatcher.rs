use crate::{Error, Order, OrderStore, WorkerPool};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Dispatcher task: the single consumer of the ingestion channel.
///
/// Classifies each incoming order, overwrites its `New` version in the store
/// with the terminal one, and forwards it to the [`WorkerPool`]. Orders leave
/// in the order they were ingested.
///
/// Runs until the shutdown token fires or every ingestion sender is dropped.
pub async fn dispatch_loop(
    mut incoming: mpsc::Receiver<Order>,
    orders: Arc<OrderStore>,
    pool: Arc<WorkerPool>,
    shutdown: CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("Order processing started");

    loop {
        let mut order = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            order = incoming.recv() => match order {
                Some(order) => order,
                None => break,
            },
        };

        if let Err(_e) = order.classify() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Skipping order: {_e}");
            continue;
        }
        orders.upsert(order.clone());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Processing order {} completed: {} ({:.2})",
            order.id(),
            order.status(),
            order.total()
        );

        match pool.send_to_next_worker(order).await {
            Ok(()) => {}
            Err(Error::Closed) => break,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Dispatcher lost a stats worker: {_e}");
                break;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Order processing stopped");
}
