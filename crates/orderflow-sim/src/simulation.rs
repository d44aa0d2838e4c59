//! Drives one batch of orders through the pipeline.

use crate::config::SimConfig;
use anyhow::Context;
use orderflow::{Error, OrderStore, Product, ProductStore, Repo, Statistics};
use std::sync::Arc;
use tokio::signal;

/// What a finished run produced.
#[derive(Debug)]
pub struct Outcome {
    pub stats: Statistics,
    pub orders_stored: usize,
    pub products_stored: usize,
}

/// Submits `config.orders` orders concurrently, waits for the pipeline to
/// drain, shuts it down and returns the final statistics.
///
/// Ctrl+C or SIGTERM closes the pipeline early and fails the run.
pub async fn run(config: SimConfig) -> anyhow::Result<Outcome> {
    let products = Arc::new(ProductStore::new());
    let orders = Arc::new(OrderStore::new());
    let repo = Arc::new(Repo::new(Arc::clone(&orders), config.pipeline.clone())?);

    tokio::select! {
        stats = drive(&config, &repo, &products) => {
            let stats = stats?;
            Ok(Outcome {
                stats,
                orders_stored: orders.len(),
                products_stored: products.len(),
            })
        }
        () = shutdown_signal() => Err(abort(&repo).await),
    }
}

/// Closes the pipeline on an interrupt and reports what was left in flight.
///
/// The pipeline may already be closing on its own when the signal lands;
/// that still counts as an interrupted run.
async fn abort(repo: &Repo) -> anyhow::Error {
    match repo.close() {
        Ok(()) | Err(Error::AlreadyClosed) => {}
        Err(e) => return e.into(),
    }
    repo.join().await;
    anyhow::anyhow!(
        "interrupted with {} orders still in flight",
        repo.progress().in_flight()
    )
}

async fn drive(
    config: &SimConfig,
    repo: &Arc<Repo>,
    products: &ProductStore,
) -> anyhow::Result<Statistics> {
    let submissions: Vec<_> = {
        let mut rng = rand::rng();
        (1..=config.orders)
            .map(|n| {
                let quantity = config.quantities.quantity(n, &mut rng);
                let product = Product::new(n.to_string(), quantity);
                products.upsert(product.clone());

                let repo = Arc::clone(repo);
                tokio::spawn(async move { repo.create_order(product).await })
            })
            .collect()
    };

    for joined in futures::future::join_all(submissions).await {
        let _order = joined
            .context("order submission task failed")?
            .context("order was not accepted")?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Order {} for product {} accepted",
            _order.id(),
            _order.product().id
        );
    }

    // Replaces waiting a fixed amount of time: resolves as soon as every
    // accepted order has been reconciled.
    let stats = repo.shutdown().await?;
    Ok(stats)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to install SIGTERM handler: {_e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(_e) = signal::ctrl_c().await {
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to install Ctrl+C handler: {_e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }
}
