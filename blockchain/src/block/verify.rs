use {
    crate::block::gas::next_base_fee,
    alloy::consensus::Header,
    magma_genesis::Kip71Config,
    magma_shared::{BaseFee, HeaderView},
    thiserror::Error,
};

/// Reasons for rejecting a block because of its declared base fee.
///
/// These invalidate a single block and are never fatal to the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaseFeeError {
    #[error("Block {number} does not declare a base fee")]
    Missing { number: u64 },
    #[error("Block {number} declares base fee {declared}, expected {expected}")]
    Mismatch {
        number: u64,
        expected: BaseFee,
        declared: BaseFee,
    },
}

/// Checks the base fee declared by the child block of `parent`.
///
/// Blocks numbered below the activation block are not governed by the fee market and pass
/// unconditionally.
#[tracing::instrument(level = "debug", skip(parent, config), fields(parent = parent.block_number))]
pub fn verify_base_fee(
    parent: &HeaderView,
    declared: Option<&BaseFee>,
    config: &Kip71Config,
) -> Result<(), BaseFeeError> {
    let number = parent.block_number.saturating_add(1);
    if number < config.activation_block() {
        return Ok(());
    }

    let declared = declared.ok_or(BaseFeeError::Missing { number })?;
    let expected = next_base_fee(parent, config);
    if *declared != expected {
        tracing::warn!("Rejected block {number}. declared base fee {declared}, expected {expected}");
        return Err(BaseFeeError::Mismatch {
            number,
            expected,
            declared: declared.clone(),
        });
    }

    Ok(())
}

/// Checks the base fee of `child` against its `parent` header.
pub fn verify_header(
    parent: &Header,
    child: &Header,
    config: &Kip71Config,
) -> Result<(), BaseFeeError> {
    let declared = child.base_fee_per_gas.map(BaseFee::from);
    verify_base_fee(&HeaderView::from(parent), declared.as_ref(), config)
}
