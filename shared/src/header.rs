use {crate::BaseFee, alloy::consensus::Header};

/// The part of a block header the base fee formula reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderView {
    pub block_number: u64,
    /// Gas consumed by the block. Capped by the block gas limit during header validation.
    pub gas_used: u64,
    /// The base fee the block was executed with.
    pub base_fee: BaseFee,
}

impl HeaderView {
    pub fn new(block_number: u64, gas_used: u64, base_fee: impl Into<BaseFee>) -> Self {
        Self {
            block_number,
            gas_used,
            base_fee: base_fee.into(),
        }
    }
}

/// Headers sealed before the fee market was activated carry no base fee; those read as zero.
impl From<&Header> for HeaderView {
    fn from(header: &Header) -> Self {
        Self {
            block_number: header.number,
            gas_used: header.gas_used,
            base_fee: header.base_fee_per_gas.map(BaseFee::from).unwrap_or_default(),
        }
    }
}
