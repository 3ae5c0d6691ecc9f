use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::primitives::{ConsensusType, Epoch, Gwei, Slot, ValidatorIndex};

/// Effective balance that counts as a weight of exactly 1.
pub const BASELINE_EFFECTIVE_BALANCE: Gwei = 32_000_000_000;

const ACTIVE_STATUS_MARKER: &str = "active";

/// Flat snapshot of one validator for one monitoring cycle.
///
/// Every field is defaulted so that records produced before a field existed still
/// deserialize. Unknown fields from newer producers are ignored.
///
/// Block sequences hold slots. The `*_finalized` sequences are expected to be subsets of
/// their non-finalized counterparts, but nothing here checks that.
#[derive(Clone, Default, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorRecord {
    pub labels: BTreeSet<String>,

    pub missed_attestation: bool,
    pub previous_missed_attestation: bool,

    pub suboptimal_source: bool,
    pub suboptimal_target: bool,
    pub suboptimal_head: bool,

    pub ideal_consensus_reward: f64,
    pub actual_consensus_reward: f64,

    pub duties_slot: Slot,
    pub duties_performed_at_slot: bool,

    pub missed_blocks: Vec<Slot>,
    pub missed_blocks_finalized: Vec<Slot>,
    pub proposed_blocks: Vec<Slot>,
    pub proposed_blocks_finalized: Vec<Slot>,
    pub future_blocks_proposal: Vec<Slot>,

    pub consensus_pubkey: String,
    pub consensus_effective_balance: Gwei,
    pub consensus_slashed: bool,
    pub consensus_index: ValidatorIndex,
    pub consensus_status: String,
    pub consensus_type: ConsensusType,
    pub consensus_activation_epoch: Epoch,

    pub weight: f64,
}

impl ValidatorRecord {
    /// Statuses like `active_ongoing`, `active_exiting` and `active_slashed` all count.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.consensus_status.contains(ACTIVE_STATUS_MARKER)
    }

    #[must_use]
    pub fn is_on_duty_at(&self, slot: Slot) -> bool {
        self.duties_slot == slot
    }

    #[must_use]
    pub fn missed_consecutive_attestations(&self) -> bool {
        self.missed_attestation && self.previous_missed_attestation
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "Effective balances are far below 2^53 Gwei."
)]
#[must_use]
pub fn weight_from_effective_balance(effective_balance: Gwei) -> f64 {
    effective_balance as f64 / BASELINE_EFFECTIVE_BALANCE as f64
}

/// Extracts the prefix byte from `0x`-prefixed withdrawal credentials.
#[must_use]
pub fn consensus_type_from_withdrawal_credentials(credentials: &str) -> Option<ConsensusType> {
    let prefix = credentials.strip_prefix("0x")?.get(..2)?;
    ConsensusType::from_str_radix(prefix, 16).ok()
}
