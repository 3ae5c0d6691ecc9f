use std::collections::BTreeMap;

use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::{partial::PartialMetrics, shard::ShardMetrics};

pub type LabelMetrics = BTreeMap<String, FinalMetrics>;

/// Merged metrics for one label with derived ratios.
#[derive(Clone, PartialEq, Debug, Deref, Deserialize, Serialize)]
pub struct FinalMetrics {
    #[deref]
    #[serde(flatten)]
    pub metrics: PartialMetrics,
    pub duties_rate: f64,
    pub duties_rate_scaled: f64,
}

impl From<PartialMetrics> for FinalMetrics {
    #[expect(clippy::cast_precision_loss, clippy::float_arithmetic)]
    fn from(metrics: PartialMetrics) -> Self {
        let performed = metrics.performed_duties;
        let missed = metrics.missed_duties;

        // Validators without duties at the evaluated slot are not penalized.
        let duties_rate = match performed.count + missed.count {
            0 => 1.0,
            total => performed.count as f64 / total as f64,
        };

        let scaled_total = performed.scaled_count + missed.scaled_count;

        let duties_rate_scaled = if scaled_total > 0.0 {
            performed.scaled_count / scaled_total
        } else {
            1.0
        };

        Self {
            metrics,
            duties_rate,
            duties_rate_scaled,
        }
    }
}

impl FinalMetrics {
    #[must_use]
    pub fn into_partial(self) -> PartialMetrics {
        self.metrics
    }

    #[must_use]
    pub fn suboptimal_source_rate(&self) -> f64 {
        percentage_of_sum(self.suboptimal_source_count, self.optimal_source_count)
    }

    #[must_use]
    pub fn suboptimal_target_rate(&self) -> f64 {
        percentage_of_sum(self.suboptimal_target_count, self.optimal_target_count)
    }

    #[must_use]
    pub fn suboptimal_head_rate(&self) -> f64 {
        percentage_of_sum(self.suboptimal_head_count, self.optimal_head_count)
    }

    #[expect(clippy::float_arithmetic)]
    #[must_use]
    pub fn consensus_rewards_rate(&self) -> f64 {
        if self.ideal_consensus_reward == 0.0 {
            return 0.0;
        }

        100.0 * self.actual_consensus_reward / self.ideal_consensus_reward
    }
}

#[expect(clippy::cast_precision_loss, clippy::float_arithmetic)]
fn percentage_of_sum(part: u64, rest: u64) -> f64 {
    match part + rest {
        0 => 0.0,
        total => 100.0 * part as f64 / total as f64,
    }
}

/// Folds shard results in the order given, then derives ratios.
///
/// Shard order only matters for which samples survive truncation.
#[must_use]
pub fn reduce(shards: impl IntoIterator<Item = ShardMetrics>, sample_limit: usize) -> LabelMetrics {
    let mut merged = BTreeMap::<String, PartialMetrics>::new();

    for shard in shards {
        // `HashMap` iteration order does not matter here because every label is folded
        // into its own entry.
        for (label, metrics) in shard {
            merged
                .entry(label)
                .or_default()
                .merge(metrics, sample_limit);
        }
    }

    merged
        .into_iter()
        .map(|(label, metrics)| (label, metrics.into()))
        .collect()
}
