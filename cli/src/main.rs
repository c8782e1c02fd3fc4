use {
    magma_cli_args::BuildError,
    std::{env, io},
};

fn main() -> anyhow::Result<()> {
    let config = match magma_cli::load_config(env::args_os()) {
        Ok(config) => config,
        Err(BuildError::Cli(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    magma_cli::set_global_tracing_subscriber();
    magma_cli::run(&config, &mut io::stdout().lock())?;

    Ok(())
}
