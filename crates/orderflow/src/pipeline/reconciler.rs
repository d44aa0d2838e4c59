use crate::{Accumulator, Progress, Statistics};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Reconciler task: the single consumer of the intermediate statistics
/// channel.
///
/// Folds every per-order [`Statistics`] into the shared [`Accumulator`] and
/// records it in [`Progress`], in whatever order the workers deliver them.
/// Runs until the shutdown token fires or every worker has dropped its sender.
pub async fn reconcile_loop(
    mut rx: mpsc::Receiver<Statistics>,
    result: Arc<Accumulator>,
    progress: Arc<Progress>,
    shutdown: CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::debug!("Reconcile started");

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            stats = rx.recv() => match stats {
                Some(stats) => {
                    result.combine(stats);
                    progress.record_reconciled();
                }
                None => break,
            },
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Reconcile stopped after {} orders ({} still in flight)",
        progress.reconciled(),
        progress.in_flight()
    );
}
