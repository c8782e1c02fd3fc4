use {
    crate::declaration::{Config, InvalidConfig, OptionalConfig},
    std::{convert::Infallible, error::Error as StdError},
    thiserror::Error,
};

/// Merges configuration layers, each one overriding the fields set by the layers below it.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder<L>(L);

impl ConfigBuilder<()> {
    pub const fn new() -> Self {
        Self(())
    }
}

/// A source of partial configuration.
pub trait Layer {
    type Err: StdError + Send + Sync + 'static;

    fn try_load(self) -> Result<OptionalConfig, Self::Err>;

    /// Classifies a load failure of this layer.
    fn build_error(err: Self::Err) -> BuildError {
        BuildError::Load(Box::new(err))
    }
}

impl Layer for () {
    type Err = Infallible;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        Ok(OptionalConfig::default())
    }
}

/// An already loaded configuration.
impl Layer for OptionalConfig {
    type Err = Infallible;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        Ok(self)
    }
}

/// A layer that may be absent, in which case it contributes nothing.
impl<L: Layer> Layer for Option<L> {
    type Err = L::Err;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        self.map_or_else(|| Ok(OptionalConfig::default()), L::try_load)
    }

    fn build_error(err: Self::Err) -> BuildError {
        L::build_error(err)
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// The command line could not be parsed, or asked for help or version output.
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("Failed to load configuration layer: {0}")]
    Load(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] InvalidConfig),
}

pub struct Stacked<Lower, Upper> {
    lower: Lower,
    upper: Upper,
}

#[derive(Debug, Clone, Error)]
pub enum StackError<LowerErr, UpperErr> {
    #[error(transparent)]
    Lower(LowerErr),
    #[error(transparent)]
    Upper(UpperErr),
}

impl<Lower: Layer, Upper: Layer> Layer for Stacked<Lower, Upper> {
    type Err = StackError<Lower::Err, Upper::Err>;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        let lower = self.lower.try_load().map_err(StackError::Lower)?;
        let upper = self.upper.try_load().map_err(StackError::Upper)?;

        Ok(lower.apply(upper))
    }

    fn build_error(err: Self::Err) -> BuildError {
        match err {
            StackError::Lower(err) => Lower::build_error(err),
            StackError::Upper(err) => Upper::build_error(err),
        }
    }
}

impl<L> ConfigBuilder<L> {
    pub fn layer<L2: Layer>(self, layer: L2) -> ConfigBuilder<Stacked<L, L2>> {
        ConfigBuilder(Stacked {
            lower: self.0,
            upper: layer,
        })
    }
}

impl<L: Layer> ConfigBuilder<L> {
    /// Loads and merges every layer without checking the result for completeness.
    pub fn try_load(self) -> Result<OptionalConfig, BuildError> {
        self.0.try_load().map_err(L::build_error)
    }

    pub fn try_build(self) -> Result<Config, BuildError> {
        Ok(self.try_load()?.try_into()?)
    }
}
