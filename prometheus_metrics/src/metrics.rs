use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::OnceCell;
use prometheus::{histogram_opts, Histogram, IntGauge, Registry};
use tracing::warn;

pub static METRICS: OnceCell<Arc<Metrics>> = OnceCell::new();

// Aggregation runs once per slot and should finish well within it.
const AGGREGATION_BUCKETS: [f64; 12] = [
    0.000_5, 0.001, 0.002_5, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

#[derive(Debug)]
pub struct Metrics {
    // Cycle timings
    pub aggregation_times: Histogram,
    pub shard_times: Histogram,
    pub reduction_times: Histogram,

    // Cycle shape
    slot: IntGauge,
    records: IntGauge,
    workers: IntGauge,
    labels: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            aggregation_times: Histogram::with_opts(histogram_opts!(
                "VALIDATOR_METRICS_AGGREGATION_TIMES",
                "Time spent aggregating validator records for one cycle",
                AGGREGATION_BUCKETS.to_vec()
            ))?,

            shard_times: Histogram::with_opts(histogram_opts!(
                "VALIDATOR_METRICS_SHARD_TIMES",
                "Time spent by one worker scanning its shard",
                AGGREGATION_BUCKETS.to_vec()
            ))?,

            reduction_times: Histogram::with_opts(histogram_opts!(
                "VALIDATOR_METRICS_REDUCTION_TIMES",
                "Time spent merging shard results",
                AGGREGATION_BUCKETS.to_vec()
            ))?,

            slot: IntGauge::new("VALIDATOR_METRICS_SLOT", "Slot of the last aggregation cycle")?,

            records: IntGauge::new(
                "VALIDATOR_METRICS_RECORDS",
                "Number of validator records in the last aggregation cycle",
            )?,

            workers: IntGauge::new(
                "VALIDATOR_METRICS_WORKERS",
                "Number of shards processed in parallel in the last aggregation cycle",
            )?,

            labels: IntGauge::new(
                "VALIDATOR_METRICS_LABELS",
                "Number of distinct labels produced by the last aggregation cycle",
            )?,
        })
    }

    pub fn register_with_default_metrics(&self) -> Result<()> {
        self.register(prometheus::default_registry())
    }

    pub fn register(&self, registry: &Registry) -> Result<()> {
        registry.register(Box::new(self.aggregation_times.clone()))?;
        registry.register(Box::new(self.shard_times.clone()))?;
        registry.register(Box::new(self.reduction_times.clone()))?;
        registry.register(Box::new(self.slot.clone()))?;
        registry.register(Box::new(self.records.clone()))?;
        registry.register(Box::new(self.workers.clone()))?;
        registry.register(Box::new(self.labels.clone()))?;

        Ok(())
    }

    pub fn set_cycle_shape(&self, slot: u64, records: usize, workers: usize) {
        match i64::try_from(slot) {
            Ok(slot) => self.slot.set(slot),
            Err(error) => warn!("unable to track slot {slot} in metrics: {error}"),
        }

        self.records.set(records.try_into().unwrap_or(i64::MAX));
        self.workers.set(workers.try_into().unwrap_or(i64::MAX));
    }

    pub fn set_labels(&self, labels: usize) {
        self.labels.set(labels.try_into().unwrap_or(i64::MAX));
    }
}
