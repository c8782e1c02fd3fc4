pub use {
    cli::CliLayer,
    default::DefaultLayer,
    env::{DEFAULT_ENV_PREFIX, EnvLayer},
    file::{DEFAULT_CONFIG_FILE, FileLayer},
};

mod cli;
mod default;
mod env;
mod file;
