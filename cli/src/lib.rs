use {
    magma_blockchain::block::{FeeProjection, Kip71GasFee},
    magma_cli_args::{
        BuildError, CliLayer, Config, ConfigBuilder, DEFAULT_CONFIG_FILE, DefaultLayer, EnvLayer,
        FileLayer, Layer, OptionalConfig,
    },
    std::{
        ffi::OsString,
        io::{self, Write},
        iter,
    },
    tracing_subscriber::EnvFilter,
};

pub fn defaults() -> DefaultLayer {
    DefaultLayer::mainnet()
}

/// Logs go to stderr so that stdout only carries the computed fees.
pub fn set_global_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}

/// Writes one `<block number> <base fee>` line for each block after the parent.
///
/// Every projected block is assumed to use as much gas as the parent did.
pub fn run(config: &Config, out: &mut impl Write) -> io::Result<()> {
    let Config {
        kip71,
        parent,
        blocks,
    } = config;

    tracing::info!(
        "Projecting {blocks} base fees after block {} using {} gas",
        parent.block_number,
        parent.gas_used
    );
    if !kip71.is_active_at(parent.block_number) {
        tracing::info!(
            "Fee market activates at block {}, blocks before it pay the initial base fee",
            kip71.activation_block()
        );
    }

    let gas_fee = Kip71GasFee::new(kip71.clone());
    let gas_used = iter::repeat_n(parent.gas_used, *blocks as usize);

    for (number, base_fee) in FeeProjection::new(gas_fee, parent.clone(), gas_used) {
        writeln!(out, "{number} {base_fee}")?;
    }

    out.flush()
}

/// Builds the configuration the way the binary does, with the command line taken from `args`.
pub fn load_config<I, T>(args: I) -> Result<Config, BuildError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let overrides = ConfigBuilder::new()
        .layer(FileLayer::toml(DEFAULT_CONFIG_FILE))
        .layer(EnvLayer::new())
        .layer(CliLayer::from_args(args));

    build_config(overrides)
}

/// Stacks `overrides` on the defaults.
///
/// When `overrides` name a genesis file, its fee market section replaces the default one as a
/// whole, so parameters the genesis leaves out stay unset instead of taking default values.
pub fn build_config<L: Layer>(overrides: ConfigBuilder<L>) -> Result<Config, BuildError> {
    let overrides = overrides.try_load()?;
    let genesis = ConfigBuilder::new()
        .layer(overrides.genesis.as_deref().map(FileLayer::genesis_json))
        .try_load()?;
    let base = ConfigBuilder::new().layer(defaults()).try_load()?;
    let base = OptionalConfig {
        kip71: genesis.kip71.or(base.kip71),
        ..base
    };

    ConfigBuilder::new().layer(base).layer(overrides).try_build()
}
