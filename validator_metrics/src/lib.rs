//! Per-label aggregation of validator health metrics.
//!
//! Records are split into contiguous index ranges, each range is scanned by its own worker
//! into a private label map, and the maps are folded in shard order once every worker is
//! done. No locks are taken while scanning.

pub use crate::{
    config::{default_worker_count, AggregationConfig, DEFAULT_SAMPLE_LIMIT},
    engine::{aggregate, AggregationEngine},
    error::Error,
    partial::PartialMetrics,
    rate::Rate,
    record::{
        consensus_type_from_withdrawal_credentials, weight_from_effective_balance,
        ValidatorRecord, BASELINE_EFFECTIVE_BALANCE,
    },
    reduce::{reduce, FinalMetrics, LabelMetrics},
    shard::{partition, process_shard, ShardMetrics},
    tally::{Histogram, Samples, Tally},
};

pub mod primitives;

mod config;
mod engine;
mod error;
mod partial;
mod rate;
mod record;
mod reduce;
mod shard;
mod tally;
