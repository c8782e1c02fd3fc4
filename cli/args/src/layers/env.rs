use {
    crate::{declaration::OptionalConfig, stack::Layer},
    std::env::{self, Vars},
};

pub const DEFAULT_ENV_PREFIX: &str = "MAGMA";

/// Environment variables such as `MAGMA_KIP71_GAS_TARGET` or `MAGMA_PARENT_BASE_FEE`.
#[derive(Debug, Clone)]
pub struct EnvLayer<Vars> {
    vars: Vars,
    prefix: &'static str,
}

impl EnvLayer<Vars> {
    pub fn new() -> Self {
        Self::from_vars(env::vars())
    }
}

impl Default for EnvLayer<Vars> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Vars> EnvLayer<Vars> {
    pub fn from_vars(vars: Vars) -> Self {
        Self {
            vars,
            prefix: DEFAULT_ENV_PREFIX,
        }
    }

    pub fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }
}

impl<Vars: IntoIterator<Item = (K, K)>, K: AsRef<str>> Layer for EnvLayer<Vars> {
    type Err = serde_env::Error;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        serde_env::from_iter_with_prefix(self.vars, self.prefix)
    }
}
