//! This module is concerned about calculating the base fee charged per unit of gas.

use {
    magma_genesis::{ConfigurationError, Kip71Config, Kip71Parameters},
    magma_shared::{BaseFee, BigUint, HeaderView},
    num::{One, Zero},
    std::cmp::Ordering,
};

/// Determines amount of fees charged per gas used in transaction execution.
///
/// The base fee applies to the entire block and does not include tips for validators.
/// Does not take into account any priority fees.
pub trait BaseGasFee {
    /// Calculates base fee per gas for the child block of `parent`.
    ///
    /// The concrete formula applied depends on the implementation.
    fn base_fee_per_gas(&self, parent: &HeaderView) -> BaseFee;
}

impl<T: BaseGasFee + ?Sized> BaseGasFee for &T {
    fn base_fee_per_gas(&self, parent: &HeaderView) -> BaseFee {
        (**self).base_fee_per_gas(parent)
    }
}

/// Calculates base fee per gas according to the KIP-71 model.
///
/// The formula works in these steps:
/// 1. Cap the *gas used* of the parent block at the configured maximum, if any.
/// 2. Compare the *gas target* to *gas used* of the parent block.
/// 3. If *gas used* exceeds *gas target*, the fee is increased by at least one.
/// 4. If *gas used* falls below *gas target*, the fee is decreased, possibly by zero.
/// 5. Otherwise, the fee is not changed.
/// 6. The result is kept within the configured lower and upper bounds.
///
/// The change is `parent_base_fee * |gas_used - gas_target| / gas_target / base_fee_denominator`
/// with each division rounding down.
///
/// Note the asymmetry between steps 3 and 4. A block that uses slightly less than the target moves
/// the fee by a tiny amount, or not at all once the fee is small enough, whereas the same distance
/// above the target always moves it. The consensus formula is defined this way and every node has
/// to reproduce it, see [`SymmetricGasFee`] for the variant that floors both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kip71GasFee {
    config: Kip71Config,
}

impl Kip71GasFee {
    pub fn new(config: Kip71Config) -> Self {
        Self { config }
    }

    pub fn try_new(params: Kip71Parameters) -> Result<Self, ConfigurationError> {
        Kip71Config::try_new(params).map(Self::new)
    }

    pub fn config(&self) -> &Kip71Config {
        &self.config
    }
}

impl BaseGasFee for Kip71GasFee {
    fn base_fee_per_gas(&self, parent: &HeaderView) -> BaseFee {
        next_base_fee(parent, &self.config)
    }
}

/// The KIP-71 formula with the decrease also floored at one.
///
/// This is how Ethereum style formulas usually handle the downward direction. It is not the
/// consensus formula of the chain, it serves as the reference against which the decrease of
/// [`Kip71GasFee`] is measured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymmetricGasFee {
    config: Kip71Config,
}

impl SymmetricGasFee {
    pub fn new(config: Kip71Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Kip71Config {
        &self.config
    }
}

impl BaseGasFee for SymmetricGasFee {
    fn base_fee_per_gas(&self, parent: &HeaderView) -> BaseFee {
        compute(parent, &self.config, Decrease::AtLeastOne)
    }
}

/// Base fee of the child block of `parent` under the KIP-71 rules.
///
/// Deterministic and total over every valid [`Kip71Config`]. Arithmetic is carried out on
/// arbitrary precision integers so no intermediate product can overflow.
pub fn next_base_fee(parent: &HeaderView, config: &Kip71Config) -> BaseFee {
    compute(parent, config, Decrease::Truncated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decrease {
    Truncated,
    AtLeastOne,
}

fn compute(parent: &HeaderView, config: &Kip71Config, decrease: Decrease) -> BaseFee {
    if !config.is_active_at(parent.block_number) {
        return config.initial_base_fee().clone();
    }

    let gas_target = config.gas_target();
    let gas_used = match config.max_block_gas_used_for_base_fee() {
        Some(max) => parent.gas_used.min(max),
        None => parent.gas_used,
    };
    let parent_base_fee = parent.base_fee.as_biguint();

    let next = match gas_used.cmp(&gas_target) {
        Ordering::Equal => return parent.base_fee.clone(),
        Ordering::Greater => {
            let delta = step(parent_base_fee, gas_used - gas_target, config).max(BigUint::one());

            parent_base_fee + delta
        }
        Ordering::Less => {
            let mut delta = step(parent_base_fee, gas_target - gas_used, config);
            if decrease == Decrease::AtLeastOne {
                delta = delta.max(BigUint::one());
            }

            if delta >= *parent_base_fee {
                BigUint::zero()
            } else {
                parent_base_fee - delta
            }
        }
    };

    let next = clamp(next, config);
    tracing::trace!(
        "Base fee of block {} is {next}, parent gas used {gas_used} of target {gas_target}",
        parent.block_number.saturating_add(1),
    );
    next
}

fn step(parent_base_fee: &BigUint, gas_delta: u64, config: &Kip71Config) -> BigUint {
    parent_base_fee * gas_delta / config.gas_target() / config.base_fee_denominator()
}

fn clamp(fee: BigUint, config: &Kip71Config) -> BaseFee {
    if let Some(upper) = config.upper_bound_base_fee()
        && fee > *upper.as_biguint()
    {
        tracing::debug!("Base fee {fee} clamped to upper bound {upper}");
        return upper.clone();
    }
    if let Some(lower) = config.lower_bound_base_fee()
        && fee < *lower.as_biguint()
    {
        tracing::debug!("Base fee {fee} clamped to lower bound {lower}");
        return lower.clone();
    }
    BaseFee::new(fee)
}
