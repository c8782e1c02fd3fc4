use {
    crate::{declaration::OptionalConfig, stack::Layer},
    magma_genesis::Kip71Parameters,
    std::convert::Infallible,
};

#[derive(Debug, Clone, Default)]
pub struct DefaultLayer(OptionalConfig);

impl DefaultLayer {
    pub const fn new(default: OptionalConfig) -> Self {
        Self(default)
    }

    /// Fee market parameters of the production chain and a single projected block.
    ///
    /// The parent header is left for the upper layers.
    pub fn mainnet() -> Self {
        Self(OptionalConfig {
            kip71: Some(Kip71Parameters::default().into()),
            parent: None,
            blocks: Some(1),
            genesis: None,
        })
    }
}

impl Layer for DefaultLayer {
    type Err = Infallible;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        Ok(self.0)
    }
}
