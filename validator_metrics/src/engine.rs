use std::sync::Arc;

use anyhow::Result;
use logging::{debug_with_cycle, trace_with_cycle, CYCLE_LOG_CONTEXT};
use prometheus_metrics::Metrics;
use rayon::{
    iter::{IntoParallelIterator as _, ParallelIterator as _},
    ThreadPoolBuilder,
};

use crate::{
    config::AggregationConfig,
    error::Error,
    primitives::Slot,
    rate::Rate,
    record::ValidatorRecord,
    reduce::{self, LabelMetrics},
    shard::{self, ShardMetrics},
};

/// Computes per-label metrics for one monitoring cycle.
///
/// Holds no state between cycles. Each call shards `records` by index, scans the shards in
/// parallel on a thread pool built for that call, and merges the results in shard order.
pub struct AggregationEngine {
    config: AggregationConfig,
    metrics: Option<Arc<Metrics>>,
}

impl AggregationEngine {
    #[must_use]
    pub const fn new(config: AggregationConfig, metrics: Option<Arc<Metrics>>) -> Self {
        Self { config, metrics }
    }

    #[must_use]
    pub const fn config(&self) -> AggregationConfig {
        self.config
    }

    pub fn aggregate(&self, records: &[ValidatorRecord], slot: Slot) -> Result<LabelMetrics> {
        let AggregationConfig {
            sample_limit,
            worker_count,
        } = self.config;

        CYCLE_LOG_CONTEXT.start_cycle(slot, records.len());

        let aggregation_timer = prometheus_metrics::start_timer(
            self.metrics.as_ref().map(|metrics| &metrics.aggregation_times),
        );

        let ranges = shard::partition(records.len(), worker_count.get());

        debug_with_cycle!(
            "aggregating validator records in {} shards with {worker_count} workers",
            ranges.len(),
        );

        if let Some(metrics) = self.metrics.as_ref() {
            metrics.set_cycle_shape(slot, records.len(), ranges.len());
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count.get())
            .thread_name(|index| format!("aggregation-worker-{index}"))
            .build()
            .map_err(Error::ThreadPool)?;

        // `collect` on an indexed parallel iterator keeps shard order regardless of which
        // worker finishes first. That order is what makes sample lists reproducible.
        let shards = pool.install(|| {
            ranges
                .into_par_iter()
                .map(|range| {
                    let timer = prometheus_metrics::start_timer(
                        self.metrics.as_ref().map(|metrics| &metrics.shard_times),
                    );

                    trace_with_cycle!("scanning records {range:?}");

                    let shard_metrics = shard::process_shard(&records[range], slot, sample_limit);

                    prometheus_metrics::stop_and_record(timer);

                    shard_metrics
                })
                .collect::<Vec<ShardMetrics>>()
        });

        let reduction_timer = prometheus_metrics::start_timer(
            self.metrics.as_ref().map(|metrics| &metrics.reduction_times),
        );

        let label_metrics = reduce::reduce(shards, sample_limit);

        prometheus_metrics::stop_and_record(reduction_timer);

        if let Some(metrics) = self.metrics.as_ref() {
            metrics.set_labels(label_metrics.len());
        }

        for (label, metrics) in &label_metrics {
            debug_with_cycle!(
                "label {label}: validators: {}, missed attestations: {}, \
                consecutive: {}, duties rate: {}, missed blocks: {}",
                metrics.validator_status.values().map(|tally| tally.count).sum::<u64>(),
                metrics.missed_attestations.count,
                metrics.missed_consecutive_attestations.count,
                Rate::from_ratio(metrics.duties_rate),
                metrics.missed_blocks,
            );
        }

        prometheus_metrics::stop_and_record(aggregation_timer);

        Ok(label_metrics)
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(AggregationConfig::default(), None)
    }
}

/// Aggregates with the default configuration and no self-instrumentation.
pub fn aggregate(records: &[ValidatorRecord], slot: Slot) -> Result<LabelMetrics> {
    AggregationEngine::default().aggregate(records, slot)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use prometheus::Registry;
    use tracing_test::traced_test;

    use super::*;

    fn watched(status: &str) -> ValidatorRecord {
        ValidatorRecord {
            labels: BTreeSet::from(["scope:watched".to_owned()]),
            consensus_status: status.to_owned(),
            weight: 1.0,
            ..ValidatorRecord::default()
        }
    }

    fn engine(worker_count: usize) -> Result<AggregationEngine> {
        let config = AggregationConfig::default().with_worker_count(worker_count)?;
        Ok(AggregationEngine::new(config, None))
    }

    #[test]
    fn empty_input_yields_empty_output() -> Result<()> {
        assert!(engine(4)?.aggregate(&[], 10)?.is_empty());
        Ok(())
    }

    #[test]
    fn fewer_records_than_workers_are_aggregated() -> Result<()> {
        let records = [watched("active_ongoing"), watched("exited_unslashed")];

        let metrics = engine(8)?.aggregate(&records, 10)?;

        assert_eq!(metrics["scope:watched"].validator_status.count("active_ongoing"), 1);
        assert_eq!(metrics["scope:watched"].validator_status.count("exited_unslashed"), 1);

        Ok(())
    }

    #[test]
    fn self_instrumentation_tracks_cycle_shape() -> Result<()> {
        let registry = Registry::new();
        let metrics = Arc::new(Metrics::new()?);
        metrics.register(&registry)?;

        let config = AggregationConfig::default().with_worker_count(2)?;
        let engine = AggregationEngine::new(config, Some(Arc::clone(&metrics)));
        let records = vec![watched("active_ongoing"); 10];

        engine.aggregate(&records, 10)?;

        assert_eq!(metrics.aggregation_times.get_sample_count(), 1);
        assert_eq!(metrics.shard_times.get_sample_count(), 2);
        assert_eq!(metrics.reduction_times.get_sample_count(), 1);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn label_summaries_are_logged() -> Result<()> {
        let records = [watched("active_ongoing")];

        engine(1)?.aggregate(&records, 10)?;

        assert!(logs_contain("aggregating validator records in 1 shards with 1 workers"));
        assert!(logs_contain("label scope:watched: validators: 1"));
        assert!(logs_contain("duties rate: 100%"));

        Ok(())
    }
}
