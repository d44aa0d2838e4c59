#![doc = include_str!("../README.md")]

mod config;
mod simulation;
mod telemetry;

use clap::Parser;
use config::{CliArgs, SimConfig};
use telemetry::init_telemetry;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = SimConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let outcome = simulation::run(config).await?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Run finished: {} orders stored, {} products stored",
        outcome.orders_stored,
        outcome.products_stored
    );

    println!("Stats: {}", serde_json::to_string(&outcome.stats)?);
    Ok(())
}

fn log_startup_info(_config: &SimConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting simulation with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting simulation: {} orders, {} workers, {}",
            _config.orders,
            _config.pipeline.worker_count,
            match _config.quantities {
                config::QuantityPlan::Stepped { step } => format!("quantity step {step}"),
                config::QuantityPlan::Random { max } => format!("random quantities up to {max}"),
            }
        );
    }
}
