use serde::{Deserialize, Serialize};

use crate::{
    primitives::{ConsensusType, Slot},
    record::ValidatorRecord,
    tally::{Histogram, Samples, Tally},
};

/// Metrics accumulated for one label.
///
/// Every field starts at zero and only grows while records are scanned, which makes
/// [`PartialMetrics::merge`] an associative and commutative fold (sample lists aside).
#[derive(Clone, Default, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PartialMetrics {
    pub validator_status: Histogram<String>,
    pub validator_type: Histogram<ConsensusType>,
    pub validator_slashes: u64,

    pub suboptimal_source_count: u64,
    pub suboptimal_target_count: u64,
    pub suboptimal_head_count: u64,
    pub optimal_source_count: u64,
    pub optimal_target_count: u64,
    pub optimal_head_count: u64,

    pub performed_duties: Tally,
    pub missed_duties: Tally,

    pub ideal_consensus_reward: f64,
    pub actual_consensus_reward: f64,

    pub missed_attestations: Tally,
    pub missed_consecutive_attestations: Tally,

    pub proposed_blocks: u64,
    pub missed_blocks: u64,
    pub proposed_blocks_finalized: u64,
    pub missed_blocks_finalized: u64,
    pub future_blocks_proposal: u64,

    pub details_proposed_blocks: Samples<(Slot, String)>,
    pub details_missed_blocks: Samples<(Slot, String)>,
    pub details_missed_blocks_finalized: Samples<(Slot, String)>,
    pub details_future_blocks: Samples<(Slot, String)>,
    pub details_missed_attestations: Samples<String>,
}

impl PartialMetrics {
    #[expect(clippy::float_arithmetic)]
    pub fn record(&mut self, validator: &ValidatorRecord, slot: Slot, sample_limit: usize) {
        let weight = validator.weight;

        self.validator_status
            .add_borrowed(validator.consensus_status.as_str(), weight);
        self.validator_type.add(validator.consensus_type, weight);
        self.validator_slashes += u64::from(validator.consensus_slashed);

        // Validators that are not active yet or anymore have no meaningful
        // attestation, duty or proposal data for the current cycle.
        if !validator.is_active() {
            return;
        }

        self.suboptimal_source_count += u64::from(validator.suboptimal_source);
        self.suboptimal_target_count += u64::from(validator.suboptimal_target);
        self.suboptimal_head_count += u64::from(validator.suboptimal_head);
        self.optimal_source_count += u64::from(!validator.suboptimal_source);
        self.optimal_target_count += u64::from(!validator.suboptimal_target);
        self.optimal_head_count += u64::from(!validator.suboptimal_head);

        if validator.is_on_duty_at(slot) {
            if validator.duties_performed_at_slot {
                self.performed_duties.add(weight);
            } else {
                self.missed_duties.add(weight);
            }
        }

        self.ideal_consensus_reward += validator.ideal_consensus_reward;
        self.actual_consensus_reward += validator.actual_consensus_reward;

        if validator.missed_attestation {
            self.missed_attestations.add(weight);

            self.details_missed_attestations
                .push_within(sample_limit, validator.consensus_pubkey.clone());
        }

        if validator.missed_consecutive_attestations() {
            self.missed_consecutive_attestations.add(weight);
        }

        self.proposed_blocks += length(&validator.proposed_blocks);
        self.missed_blocks += length(&validator.missed_blocks);
        self.proposed_blocks_finalized += length(&validator.proposed_blocks_finalized);
        self.missed_blocks_finalized += length(&validator.missed_blocks_finalized);
        self.future_blocks_proposal += length(&validator.future_blocks_proposal);

        let pubkey = &validator.consensus_pubkey;

        for (slots, details) in [
            (&validator.proposed_blocks, &mut self.details_proposed_blocks),
            (&validator.missed_blocks, &mut self.details_missed_blocks),
            (
                &validator.missed_blocks_finalized,
                &mut self.details_missed_blocks_finalized,
            ),
            (
                &validator.future_blocks_proposal,
                &mut self.details_future_blocks,
            ),
        ] {
            details.extend_within(
                sample_limit,
                slots.iter().map(|block_slot| (*block_slot, pubkey.clone())),
            );
        }
    }

    /// Folds `other` into `self`. Samples from `self` come first.
    #[expect(clippy::float_arithmetic)]
    pub fn merge(&mut self, other: Self, sample_limit: usize) {
        let Self {
            validator_status,
            validator_type,
            validator_slashes,
            suboptimal_source_count,
            suboptimal_target_count,
            suboptimal_head_count,
            optimal_source_count,
            optimal_target_count,
            optimal_head_count,
            performed_duties,
            missed_duties,
            ideal_consensus_reward,
            actual_consensus_reward,
            missed_attestations,
            missed_consecutive_attestations,
            proposed_blocks,
            missed_blocks,
            proposed_blocks_finalized,
            missed_blocks_finalized,
            future_blocks_proposal,
            details_proposed_blocks,
            details_missed_blocks,
            details_missed_blocks_finalized,
            details_future_blocks,
            details_missed_attestations,
        } = other;

        self.validator_status.merge(validator_status);
        self.validator_type.merge(validator_type);
        self.validator_slashes += validator_slashes;

        self.suboptimal_source_count += suboptimal_source_count;
        self.suboptimal_target_count += suboptimal_target_count;
        self.suboptimal_head_count += suboptimal_head_count;
        self.optimal_source_count += optimal_source_count;
        self.optimal_target_count += optimal_target_count;
        self.optimal_head_count += optimal_head_count;

        self.performed_duties.merge(performed_duties);
        self.missed_duties.merge(missed_duties);

        self.ideal_consensus_reward += ideal_consensus_reward;
        self.actual_consensus_reward += actual_consensus_reward;

        self.missed_attestations.merge(missed_attestations);
        self.missed_consecutive_attestations
            .merge(missed_consecutive_attestations);

        self.proposed_blocks += proposed_blocks;
        self.missed_blocks += missed_blocks;
        self.proposed_blocks_finalized += proposed_blocks_finalized;
        self.missed_blocks_finalized += missed_blocks_finalized;
        self.future_blocks_proposal += future_blocks_proposal;

        self.details_proposed_blocks
            .merge(sample_limit, details_proposed_blocks);
        self.details_missed_blocks
            .merge(sample_limit, details_missed_blocks);
        self.details_missed_blocks_finalized
            .merge(sample_limit, details_missed_blocks_finalized);
        self.details_future_blocks
            .merge(sample_limit, details_future_blocks);
        self.details_missed_attestations
            .merge(sample_limit, details_missed_attestations);
    }
}

fn length(slots: &[Slot]) -> u64 {
    // `usize` fits in `u64` on every supported target.
    slots.len() as u64
}
