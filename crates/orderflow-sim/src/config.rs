//! Command-line and environment configuration for the simulation.

use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use orderflow::{DEFAULT_WORKER_COUNT, PipelineConfig};
use rand::Rng;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "orderflow-sim",
    version,
    about = "Push a batch of orders through the pipeline and report the statistics"
)]
pub struct CliArgs {
    /// Number of orders to submit.
    #[arg(long, env = "ORDERFLOW_ORDERS", default_value_t = 10)]
    pub orders: usize,

    /// Number of parallel stats workers.
    #[arg(long, env = "ORDERFLOW_WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Order `i` (1-based) gets quantity `i * step`.
    #[arg(long, env = "ORDERFLOW_QUANTITY_STEP", default_value_t = 10)]
    pub quantity_step: u32,

    /// Draw quantities uniformly from `1..=max` instead of stepping.
    #[arg(long, env = "ORDERFLOW_RANDOM_MAX")]
    pub random_max_quantity: Option<u32>,

    /// Simulated cost of processing one order, in milliseconds.
    #[arg(long, env = "ORDERFLOW_DELAY_MS", default_value_t = 0)]
    pub processing_delay_ms: u64,

    /// Capacity of the intermediate statistics channel (defaults to the
    /// worker count).
    #[arg(long, env = "ORDERFLOW_STATS_BUFFER")]
    pub stats_buffer: Option<usize>,
}

/// How order quantities are chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityPlan {
    /// Order `i` (1-based) gets `i * step`.
    Stepped { step: u32 },
    /// Uniform in `1..=max`.
    Random { max: u32 },
}

impl QuantityPlan {
    /// Quantity for the 1-based order number `n`.
    pub fn quantity<R: Rng>(self, n: usize, rng: &mut R) -> u32 {
        match self {
            Self::Stepped { step } => u32::try_from(n).unwrap_or(u32::MAX).saturating_mul(step),
            Self::Random { max } => rng.random_range(1..=max),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub orders: usize,
    pub quantities: QuantityPlan,
    pub pipeline: PipelineConfig,
}

impl TryFrom<CliArgs> for SimConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.orders == 0 {
            bail!("--orders must be greater than 0");
        }

        let quantities = match args.random_max_quantity {
            Some(0) => bail!("--random-max-quantity must be greater than 0"),
            Some(max) => QuantityPlan::Random { max },
            None => QuantityPlan::Stepped {
                step: args.quantity_step,
            },
        };

        let mut pipeline = PipelineConfig::new()
            .with_worker_count(args.workers)
            .with_processing_delay(Duration::from_millis(args.processing_delay_ms));
        if let Some(stats_buffer) = args.stats_buffer {
            pipeline = pipeline.with_stats_buffer(stats_buffer);
        }
        pipeline.validate()?;

        Ok(Self {
            orders: args.orders,
            quantities,
            pipeline,
        })
    }
}
