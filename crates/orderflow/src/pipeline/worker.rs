use crate::{Order, Statistics};
use core::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Stats worker task.
///
/// Receives classified orders from its own channel, turns each into a
/// per-order [`Statistics`] and publishes it on the bounded intermediate
/// channel read by the reconciler. Publishing blocks while that channel is
/// full.
///
/// Runs until the shutdown token fires or either channel closes. Orders still
/// queued when the token fires are dropped.
///
/// # Arguments
///
/// - `worker_id`: Numeric identifier for this worker (used for logs/tracing).
/// - `rx`: Receiver through which classified orders arrive.
/// - `stats_tx`: Sender for the intermediate statistics channel.
/// - `shutdown`: Shared cancellation token.
/// - `processing_delay`: Simulated cost of processing one order.
pub async fn worker_loop(
    worker_id: usize,
    mut rx: mpsc::Receiver<Order>,
    stats_tx: mpsc::Sender<Statistics>,
    shutdown: CancellationToken,
    processing_delay: Duration,
) {
    #[cfg(feature = "tracing")]
    tracing::debug!("Stats worker {worker_id} started");

    loop {
        let order = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            order = rx.recv() => match order {
                Some(order) => order,
                None => break,
            },
        };

        let stats = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            stats = process_order(&order, processing_delay) => stats,
        };

        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            sent = stats_tx.send(stats) => {
                if let Err(_e) = sent {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Stats worker {worker_id} lost the reconciler: {_e}");
                    break;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("Stats worker {worker_id} processed order {}", order.id());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Stats worker {worker_id} stopped");

    #[cfg(not(feature = "tracing"))]
    let _ = worker_id;
}

/// Computes the statistics contribution of a single classified order.
///
/// `delay` stands in for an expensive computation and is skipped when zero.
pub async fn process_order(order: &Order, delay: Duration) -> Statistics {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    Statistics::from_order(order)
}
