use {
    clap::{Args, Parser},
    magma_genesis::{ConfigurationError, Kip71Config, Kip71Parameters},
    magma_shared::{BaseFee, HeaderView},
    serde::Deserialize,
    std::{fmt::Debug, path::PathBuf},
    thiserror::Error,
};

#[derive(PartialEq, Debug, Clone)]
pub struct Config {
    pub kip71: Kip71Config,
    pub parent: HeaderView,
    /// Number of blocks to project past the parent.
    pub blocks: u32,
}

#[derive(Deserialize, Parser, PartialEq, Debug, Clone, Default)]
#[command(name = "magma-fee", about = "Computes KIP-71 base fees of the blocks after a parent")]
pub struct OptionalConfig {
    #[command(flatten)]
    pub kip71: Option<OptionalKip71>,
    #[command(flatten)]
    pub parent: Option<OptionalParent>,
    #[arg(long)]
    pub blocks: Option<u32>,
    /// JSON genesis file whose `config.kip71` section replaces the default fee market parameters.
    #[arg(long)]
    pub genesis: Option<PathBuf>,
}

/// Fee market parameters. Bounds and the gas used cap stay unset when no layer provides them.
#[derive(Deserialize, Args, PartialEq, Debug, Clone, Default)]
pub struct OptionalKip71 {
    #[arg(long = "kip71.gas-target", id = "kip71.gas-target")]
    pub gas_target: Option<u64>,
    #[arg(long = "kip71.base-fee-denominator", id = "kip71.base-fee-denominator")]
    pub base_fee_denominator: Option<u64>,
    #[arg(long = "kip71.lower-bound-base-fee", id = "kip71.lower-bound-base-fee")]
    pub lower_bound_base_fee: Option<BaseFee>,
    #[arg(long = "kip71.upper-bound-base-fee", id = "kip71.upper-bound-base-fee")]
    pub upper_bound_base_fee: Option<BaseFee>,
    #[arg(
        long = "kip71.max-block-gas-used-for-base-fee",
        id = "kip71.max-block-gas-used-for-base-fee"
    )]
    pub max_block_gas_used_for_base_fee: Option<u64>,
    #[arg(long = "kip71.initial-base-fee", id = "kip71.initial-base-fee")]
    pub initial_base_fee: Option<BaseFee>,
    #[arg(long = "kip71.activation-block", id = "kip71.activation-block")]
    pub activation_block: Option<u64>,
}

#[derive(Deserialize, Args, PartialEq, Debug, Clone, Default)]
pub struct OptionalParent {
    #[arg(long = "parent.number", id = "parent.number")]
    pub number: Option<u64>,
    #[arg(long = "parent.gas-used", id = "parent.gas-used")]
    pub gas_used: Option<u64>,
    #[arg(long = "parent.base-fee", id = "parent.base-fee")]
    pub base_fee: Option<BaseFee>,
}

#[derive(Debug, Clone, Error)]
#[error("Missing field `{0}`")]
pub struct MissingField(&'static str);

#[derive(Debug, Clone, Error)]
pub enum InvalidConfig {
    #[error(transparent)]
    Missing(#[from] MissingField),
    #[error(transparent)]
    Kip71(#[from] ConfigurationError),
}

impl TryFrom<OptionalConfig> for Config {
    type Error = InvalidConfig;

    fn try_from(value: OptionalConfig) -> Result<Self, Self::Error> {
        let params: Kip71Parameters = value.kip71.ok_or(MissingField("kip71"))?.try_into()?;

        Ok(Self {
            kip71: Kip71Config::try_new(params)?,
            parent: value.parent.ok_or(MissingField("parent"))?.try_into()?,
            blocks: value.blocks.ok_or(MissingField("blocks"))?,
        })
    }
}

impl TryFrom<OptionalKip71> for Kip71Parameters {
    type Error = MissingField;

    fn try_from(value: OptionalKip71) -> Result<Self, Self::Error> {
        Ok(Self {
            gas_target: value.gas_target.ok_or(MissingField("kip71.gas-target"))?,
            base_fee_denominator: value
                .base_fee_denominator
                .ok_or(MissingField("kip71.base-fee-denominator"))?,
            lower_bound_base_fee: value.lower_bound_base_fee,
            upper_bound_base_fee: value.upper_bound_base_fee,
            max_block_gas_used_for_base_fee: value.max_block_gas_used_for_base_fee,
            initial_base_fee: value
                .initial_base_fee
                .ok_or(MissingField("kip71.initial-base-fee"))?,
            activation_block: value
                .activation_block
                .ok_or(MissingField("kip71.activation-block"))?,
        })
    }
}

impl TryFrom<OptionalParent> for HeaderView {
    type Error = MissingField;

    fn try_from(value: OptionalParent) -> Result<Self, Self::Error> {
        Ok(Self {
            block_number: value.number.ok_or(MissingField("parent.number"))?,
            gas_used: value.gas_used.ok_or(MissingField("parent.gas-used"))?,
            base_fee: value.base_fee.ok_or(MissingField("parent.base-fee"))?,
        })
    }
}

impl OptionalConfig {
    pub fn apply(mut self, other: Self) -> Self {
        let Self {
            kip71,
            parent,
            blocks,
            genesis,
        } = other;

        self.kip71 = match (self.kip71, kip71) {
            (Some(ours), Some(theirs)) => Some(ours.apply(theirs)),
            (ours, theirs) => theirs.or(ours),
        };
        self.parent = match (self.parent, parent) {
            (Some(ours), Some(theirs)) => Some(ours.apply(theirs)),
            (ours, theirs) => theirs.or(ours),
        };
        self.blocks = blocks.or(self.blocks);
        self.genesis = genesis.or(self.genesis);

        self
    }
}

impl OptionalKip71 {
    pub fn apply(mut self, other: Self) -> Self {
        let Self {
            gas_target,
            base_fee_denominator,
            lower_bound_base_fee,
            upper_bound_base_fee,
            max_block_gas_used_for_base_fee,
            initial_base_fee,
            activation_block,
        } = other;

        self.gas_target = gas_target.or(self.gas_target);
        self.base_fee_denominator = base_fee_denominator.or(self.base_fee_denominator);
        self.lower_bound_base_fee = lower_bound_base_fee.or(self.lower_bound_base_fee);
        self.upper_bound_base_fee = upper_bound_base_fee.or(self.upper_bound_base_fee);
        self.max_block_gas_used_for_base_fee =
            max_block_gas_used_for_base_fee.or(self.max_block_gas_used_for_base_fee);
        self.initial_base_fee = initial_base_fee.or(self.initial_base_fee);
        self.activation_block = activation_block.or(self.activation_block);

        self
    }
}

impl OptionalParent {
    pub fn apply(mut self, other: Self) -> Self {
        let Self {
            number,
            gas_used,
            base_fee,
        } = other;

        self.number = number.or(self.number);
        self.gas_used = gas_used.or(self.gas_used);
        self.base_fee = base_fee.or(self.base_fee);

        self
    }
}

impl From<Kip71Parameters> for OptionalKip71 {
    fn from(value: Kip71Parameters) -> Self {
        Self {
            gas_target: Some(value.gas_target),
            base_fee_denominator: Some(value.base_fee_denominator),
            lower_bound_base_fee: value.lower_bound_base_fee,
            upper_bound_base_fee: value.upper_bound_base_fee,
            max_block_gas_used_for_base_fee: value.max_block_gas_used_for_base_fee,
            initial_base_fee: Some(value.initial_base_fee),
            activation_block: Some(value.activation_block),
        }
    }
}
