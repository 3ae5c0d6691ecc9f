pub type Epoch = u64;
pub type Gwei = u64;
pub type Slot = u64;
pub type ValidatorIndex = u64;

/// Numeric withdrawal credential prefix (`0x00` BLS, `0x01` execution, `0x02` compounding).
pub type ConsensusType = u8;
