use {
    crate::block::gas::BaseGasFee,
    magma_shared::{BaseFee, HeaderView},
};

/// Base fees of consecutive blocks, given how much gas each of them uses.
///
/// Starting from a parent header, every item of `gas_used` is taken as the gas consumed by the
/// latest block and yields the number and base fee of the block after it.
#[derive(Debug, Clone)]
pub struct FeeProjection<F, I> {
    gas_fee: F,
    parent: HeaderView,
    gas_used: I,
}

impl<F: BaseGasFee, I: Iterator<Item = u64>> FeeProjection<F, I> {
    /// The `gas_used` field of `parent` is ignored, the first item of `gas_used` replaces it.
    pub fn new(
        gas_fee: F,
        parent: HeaderView,
        gas_used: impl IntoIterator<Item = u64, IntoIter = I>,
    ) -> Self {
        Self {
            gas_fee,
            parent,
            gas_used: gas_used.into_iter(),
        }
    }
}

impl<F: BaseGasFee, I: Iterator<Item = u64>> Iterator for FeeProjection<F, I> {
    type Item = (u64, BaseFee);

    fn next(&mut self) -> Option<Self::Item> {
        self.parent.gas_used = self.gas_used.next()?;
        let base_fee = self.gas_fee.base_fee_per_gas(&self.parent);
        let number = self.parent.block_number.saturating_add(1);

        self.parent = HeaderView::new(number, 0, base_fee.clone());

        Some((number, base_fee))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.gas_used.size_hint()
    }
}
