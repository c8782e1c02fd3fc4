pub use {
    declaration::*,
    layers::{
        CliLayer, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX, DefaultLayer, EnvLayer, FileLayer,
    },
    stack::{BuildError, ConfigBuilder, Layer, StackError, Stacked},
};

mod declaration;
mod layers;
mod stack;
