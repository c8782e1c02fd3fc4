//! Chain-wide parameters of the KIP-71 fee market.
//!
//! [`Kip71Parameters`] is the raw form found in genesis files and configuration layers.
//! [`Kip71Config`] is the only form the fee formula accepts. It can only be obtained by validating
//! a set of parameters, so a broken configuration stops the node at startup instead of surfacing as
//! a division by zero in the middle of block import.

use {
    magma_shared::BaseFee,
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

pub const DEFAULT_GAS_TARGET: u64 = 30_000_000;
pub const DEFAULT_BASE_FEE_DENOMINATOR: u64 = 20;
pub const DEFAULT_LOWER_BOUND_BASE_FEE: u64 = 25_000_000_000;
pub const DEFAULT_UPPER_BOUND_BASE_FEE: u64 = 750_000_000_000;
pub const DEFAULT_MAX_BLOCK_GAS_USED_FOR_BASE_FEE: u64 = 60_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("KIP-71 `gas_target` must be greater than zero")]
    ZeroGasTarget,
    #[error("KIP-71 `base_fee_denominator` must be greater than zero")]
    ZeroBaseFeeDenominator,
    #[error("KIP-71 lower bound base fee {lower} exceeds upper bound base fee {upper}")]
    InvertedBounds { lower: BaseFee, upper: BaseFee },
    #[error(
        "KIP-71 `max_block_gas_used_for_base_fee` {max} must exceed `gas_target` {target}, the base fee could never increase"
    )]
    MaxBlockGasUsedNotAboveTarget { max: u64, target: u64 },
}

/// Unvalidated fee market parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kip71Parameters {
    /// Gas used per block at which the base fee stays unchanged.
    pub gas_target: u64,
    /// The greater the value the smaller the largest change of the base fee between two blocks.
    pub base_fee_denominator: u64,
    pub lower_bound_base_fee: Option<BaseFee>,
    pub upper_bound_base_fee: Option<BaseFee>,
    /// Parent gas used above this value is treated as exactly this value.
    pub max_block_gas_used_for_base_fee: Option<u64>,
    /// Base fee of the blocks that have no fee market parent.
    pub initial_base_fee: BaseFee,
    /// First block numbered past this one derives its base fee from its parent. This block and the
    /// ones before it carry `initial_base_fee`.
    #[serde(default)]
    pub activation_block: u64,
}

impl Default for Kip71Parameters {
    fn default() -> Self {
        Self {
            gas_target: DEFAULT_GAS_TARGET,
            base_fee_denominator: DEFAULT_BASE_FEE_DENOMINATOR,
            lower_bound_base_fee: Some(DEFAULT_LOWER_BOUND_BASE_FEE.into()),
            upper_bound_base_fee: Some(DEFAULT_UPPER_BOUND_BASE_FEE.into()),
            max_block_gas_used_for_base_fee: Some(DEFAULT_MAX_BLOCK_GAS_USED_FOR_BASE_FEE),
            initial_base_fee: DEFAULT_LOWER_BOUND_BASE_FEE.into(),
            activation_block: 0,
        }
    }
}

impl Kip71Parameters {
    /// Parameters with neither bounds nor a gas used cap.
    pub fn unbounded(gas_target: u64, base_fee_denominator: u64) -> Self {
        Self {
            gas_target,
            base_fee_denominator,
            lower_bound_base_fee: None,
            upper_bound_base_fee: None,
            max_block_gas_used_for_base_fee: None,
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, lower: Option<BaseFee>, upper: Option<BaseFee>) -> Self {
        self.lower_bound_base_fee = lower;
        self.upper_bound_base_fee = upper;
        self
    }

    pub fn with_max_block_gas_used(mut self, max: Option<u64>) -> Self {
        self.max_block_gas_used_for_base_fee = max;
        self
    }

    pub fn with_initial_base_fee(mut self, initial_base_fee: impl Into<BaseFee>) -> Self {
        self.initial_base_fee = initial_base_fee.into();
        self
    }

    pub fn with_activation_block(mut self, activation_block: u64) -> Self {
        self.activation_block = activation_block;
        self
    }
}

/// Validated fee market parameters, immutable for the lifetime of a fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Kip71Parameters", into = "Kip71Parameters")]
pub struct Kip71Config {
    gas_target: u64,
    base_fee_denominator: u64,
    lower_bound_base_fee: Option<BaseFee>,
    upper_bound_base_fee: Option<BaseFee>,
    max_block_gas_used_for_base_fee: Option<u64>,
    initial_base_fee: BaseFee,
    activation_block: u64,
}

impl Kip71Config {
    pub fn try_new(params: Kip71Parameters) -> Result<Self, ConfigurationError> {
        let Kip71Parameters {
            gas_target,
            base_fee_denominator,
            lower_bound_base_fee,
            upper_bound_base_fee,
            max_block_gas_used_for_base_fee,
            initial_base_fee,
            activation_block,
        } = params;

        if gas_target == 0 {
            return Err(ConfigurationError::ZeroGasTarget);
        }
        if base_fee_denominator == 0 {
            return Err(ConfigurationError::ZeroBaseFeeDenominator);
        }
        if let (Some(lower), Some(upper)) = (&lower_bound_base_fee, &upper_bound_base_fee)
            && lower > upper
        {
            return Err(ConfigurationError::InvertedBounds {
                lower: lower.clone(),
                upper: upper.clone(),
            });
        }
        if let Some(max) = max_block_gas_used_for_base_fee
            && max <= gas_target
        {
            return Err(ConfigurationError::MaxBlockGasUsedNotAboveTarget {
                max,
                target: gas_target,
            });
        }

        Ok(Self {
            gas_target,
            base_fee_denominator,
            lower_bound_base_fee,
            upper_bound_base_fee,
            max_block_gas_used_for_base_fee,
            initial_base_fee,
            activation_block,
        })
    }

    pub fn gas_target(&self) -> u64 {
        self.gas_target
    }

    pub fn base_fee_denominator(&self) -> u64 {
        self.base_fee_denominator
    }

    pub fn lower_bound_base_fee(&self) -> Option<&BaseFee> {
        self.lower_bound_base_fee.as_ref()
    }

    pub fn upper_bound_base_fee(&self) -> Option<&BaseFee> {
        self.upper_bound_base_fee.as_ref()
    }

    pub fn max_block_gas_used_for_base_fee(&self) -> Option<u64> {
        self.max_block_gas_used_for_base_fee
    }

    pub fn initial_base_fee(&self) -> &BaseFee {
        &self.initial_base_fee
    }

    pub fn activation_block(&self) -> u64 {
        self.activation_block
    }

    /// Whether the base fee of the child of block `parent_number` derives from its parent.
    pub fn is_active_at(&self, parent_number: u64) -> bool {
        parent_number >= self.activation_block
    }
}

/// The production chain's genesis parameters.
impl Default for Kip71Config {
    fn default() -> Self {
        let Kip71Parameters {
            gas_target,
            base_fee_denominator,
            lower_bound_base_fee,
            upper_bound_base_fee,
            max_block_gas_used_for_base_fee,
            initial_base_fee,
            activation_block,
        } = Kip71Parameters::default();

        Self {
            gas_target,
            base_fee_denominator,
            lower_bound_base_fee,
            upper_bound_base_fee,
            max_block_gas_used_for_base_fee,
            initial_base_fee,
            activation_block,
        }
    }
}

impl TryFrom<Kip71Parameters> for Kip71Config {
    type Error = ConfigurationError;

    fn try_from(value: Kip71Parameters) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Kip71Config> for Kip71Parameters {
    fn from(value: Kip71Config) -> Self {
        Self {
            gas_target: value.gas_target,
            base_fee_denominator: value.base_fee_denominator,
            lower_bound_base_fee: value.lower_bound_base_fee,
            upper_bound_base_fee: value.upper_bound_base_fee,
            max_block_gas_used_for_base_fee: value.max_block_gas_used_for_base_fee,
            initial_base_fee: value.initial_base_fee,
            activation_block: value.activation_block,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test]
    fn test_default_parameters_are_valid() {
        let config = Kip71Config::try_new(Kip71Parameters::default()).unwrap();

        assert_eq!(config.gas_target(), DEFAULT_GAS_TARGET);
        assert_eq!(config.base_fee_denominator(), DEFAULT_BASE_FEE_DENOMINATOR);
        assert_eq!(
            config.lower_bound_base_fee(),
            Some(&BaseFee::from(DEFAULT_LOWER_BOUND_BASE_FEE))
        );
        assert_eq!(
            config.upper_bound_base_fee(),
            Some(&BaseFee::from(DEFAULT_UPPER_BOUND_BASE_FEE))
        );
        assert_eq!(config.activation_block(), 0);
    }

    #[test_case(
        Kip71Parameters::unbounded(0, 20),
        ConfigurationError::ZeroGasTarget;
        "zero gas target"
    )]
    #[test_case(
        Kip71Parameters::unbounded(30_000_000, 0),
        ConfigurationError::ZeroBaseFeeDenominator;
        "zero denominator"
    )]
    #[test_case(
        Kip71Parameters::unbounded(0, 0),
        ConfigurationError::ZeroGasTarget;
        "gas target is checked first"
    )]
    #[test_case(
        Kip71Parameters::unbounded(30_000_000, 20)
            .with_bounds(Some(BaseFee::from(2u64)), Some(BaseFee::from(1u64))),
        ConfigurationError::InvertedBounds { lower: BaseFee::from(2u64), upper: BaseFee::from(1u64) };
        "inverted bounds"
    )]
    #[test_case(
        Kip71Parameters::unbounded(30_000_000, 20).with_max_block_gas_used(Some(0)),
        ConfigurationError::MaxBlockGasUsedNotAboveTarget { max: 0, target: 30_000_000 };
        "zero gas used cap"
    )]
    #[test_case(
        Kip71Parameters::unbounded(30_000_000, 20).with_max_block_gas_used(Some(29_999_999)),
        ConfigurationError::MaxBlockGasUsedNotAboveTarget { max: 29_999_999, target: 30_000_000 };
        "gas used cap below target"
    )]
    #[test_case(
        Kip71Parameters::unbounded(30_000_000, 20).with_max_block_gas_used(Some(30_000_000)),
        ConfigurationError::MaxBlockGasUsedNotAboveTarget { max: 30_000_000, target: 30_000_000 };
        "gas used cap at target"
    )]
    fn test_invalid_parameters_are_rejected(
        params: Kip71Parameters,
        expected_error: ConfigurationError,
    ) {
        let actual_error = Kip71Config::try_new(params).unwrap_err();

        assert_eq!(actual_error, expected_error);
    }

    #[test]
    fn test_equal_bounds_and_cap_just_above_target_are_accepted() {
        let params = Kip71Parameters::unbounded(30_000_000, 20)
            .with_bounds(Some(BaseFee::from(5u64)), Some(BaseFee::from(5u64)))
            .with_max_block_gas_used(Some(30_000_001));

        assert!(Kip71Config::try_new(params).is_ok());
    }

    #[test_case(0, 0, true)]
    #[test_case(10, 9, false)]
    #[test_case(10, 10, true)]
    #[test_case(10, 11, true)]
    fn test_activation_is_judged_by_parent_number(activation: u64, parent: u64, expected: bool) {
        let config = Kip71Config::try_new(
            Kip71Parameters::unbounded(30_000_000, 20).with_activation_block(activation),
        )
        .unwrap();

        assert_eq!(config.is_active_at(parent), expected);
    }

    #[test]
    fn test_default_config_matches_validated_default_parameters() {
        let validated = Kip71Config::try_new(Kip71Parameters::default()).unwrap();

        assert_eq!(Kip71Config::default(), validated);
    }

    #[test]
    fn test_config_deserializes_from_toml_with_optional_fields_missing() {
        let actual_config: Kip71Config = toml::from_str(
            r#"
            gas_target = 30000000
            base_fee_denominator = 20
            initial_base_fee = "25000000000"
        "#,
        )
        .unwrap();
        let expected_config =
            Kip71Config::try_new(Kip71Parameters::unbounded(30_000_000, 20)).unwrap();

        assert_eq!(actual_config, expected_config);
    }

    #[test]
    fn test_config_deserialization_fails_fast_on_zero_gas_target() {
        let result: Result<Kip71Config, _> = serde_json::from_str(
            r#"{ "gas_target": 0, "base_fee_denominator": 20, "initial_base_fee": "1" }"#,
        );

        let message = result.unwrap_err().to_string();
        assert!(message.contains("gas_target"), "{message}");
    }

    #[test]
    fn test_config_serializes_through_parameters() {
        let config = Kip71Config::try_new(Kip71Parameters::default()).unwrap();

        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["gas_target"], 30_000_000);
        assert_eq!(json["lower_bound_base_fee"], "25000000000");
        assert_eq!(json["max_block_gas_used_for_base_fee"], 60_000_000);
    }
}
