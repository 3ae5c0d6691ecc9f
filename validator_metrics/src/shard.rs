use core::ops::Range;
use std::collections::HashMap;

use crate::{partial::PartialMetrics, primitives::Slot, record::ValidatorRecord};

pub type ShardMetrics = HashMap<String, PartialMetrics>;

/// Splits `0..length` into at most `shard_count` contiguous ranges.
///
/// Ranges never outnumber records, except that an empty input still gets one empty range.
/// All ranges but the last have the same length. The last one absorbs the remainder.
#[must_use]
pub fn partition(length: usize, shard_count: usize) -> Vec<Range<usize>> {
    let shard_count = shard_count.min(length).max(1);
    let shard_length = length / shard_count;

    (0..shard_count)
        .map(|index| {
            let start = index * shard_length;
            let end = if index + 1 == shard_count {
                length
            } else {
                start + shard_length
            };

            start..end
        })
        .collect()
}

/// Scans one shard. Each label of each record is accumulated independently.
/// Records without labels contribute nothing.
#[must_use]
pub fn process_shard(records: &[ValidatorRecord], slot: Slot, sample_limit: usize) -> ShardMetrics {
    let mut metrics = ShardMetrics::new();

    for record in records {
        for label in &record.labels {
            // Avoid allocating a key for labels already seen in this shard.
            if let Some(label_metrics) = metrics.get_mut(label) {
                label_metrics.record(record, slot, sample_limit);
            } else {
                metrics
                    .entry(label.clone())
                    .or_default()
                    .record(record, slot, sample_limit);
            }
        }
    }

    metrics
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use test_case::test_case;

    use super::*;

    #[test_case(0, 4, &[0..0])]
    #[test_case(3, 7, &[0..1, 1..2, 2..3])]
    #[test_case(10, 1, &[0..10])]
    #[test_case(10, 3, &[0..3, 3..6, 6..10])]
    #[test_case(12, 4, &[0..3, 3..6, 6..9, 9..12])]
    #[test_case(5, 0, &[0..5]; "zero shards treated as one")]
    fn partition_covers_everything_exactly_once(
        length: usize,
        shard_count: usize,
        expected: &[Range<usize>],
    ) {
        assert_eq!(partition(length, shard_count), expected);
    }

    #[test]
    fn partition_ranges_are_contiguous_for_many_shapes() {
        for length in 0..50 {
            for shard_count in 1..10 {
                let ranges = partition(length, shard_count);

                assert!(ranges.len() <= shard_count);
                assert_eq!(ranges.first().map(|range| range.start), Some(0));
                assert_eq!(ranges.last().map(|range| range.end), Some(length));

                for (previous, next) in ranges.iter().zip(ranges.iter().skip(1)) {
                    assert_eq!(previous.end, next.start);
                }
            }
        }
    }

    #[test]
    fn records_contribute_to_every_label_they_carry() {
        let labels = |labels: &[&str]| {
            labels
                .iter()
                .copied()
                .map(ToOwned::to_owned)
                .collect::<BTreeSet<_>>()
        };

        let records = [
            ValidatorRecord {
                labels: labels(&["scope:watched", "operator:a"]),
                consensus_status: "active_ongoing".to_owned(),
                missed_attestation: true,
                weight: 1.0,
                ..ValidatorRecord::default()
            },
            ValidatorRecord {
                labels: labels(&["scope:watched"]),
                consensus_status: "active_ongoing".to_owned(),
                weight: 1.0,
                ..ValidatorRecord::default()
            },
            ValidatorRecord {
                labels: BTreeSet::new(),
                consensus_status: "active_ongoing".to_owned(),
                missed_attestation: true,
                weight: 1.0,
                ..ValidatorRecord::default()
            },
        ];

        let metrics = process_shard(&records, 0, 5);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["scope:watched"].validator_status.count("active_ongoing"), 2);
        assert_eq!(metrics["scope:watched"].missed_attestations.count, 1);
        assert_eq!(metrics["operator:a"].validator_status.count("active_ongoing"), 1);
        assert_eq!(metrics["operator:a"].missed_attestations.count, 1);
    }
}
