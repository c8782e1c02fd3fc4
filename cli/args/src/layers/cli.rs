use {
    crate::{
        declaration::OptionalConfig,
        stack::{BuildError, Layer},
    },
    clap::Parser,
    std::{
        env::{self, ArgsOs},
        ffi::OsString,
    },
};

/// Command line flags, the first item being the program name.
#[derive(Debug, Clone, Default)]
pub struct CliLayer<Args>(Args);

impl CliLayer<ArgsOs> {
    pub fn new() -> Self {
        Self(env::args_os())
    }
}

impl<Args> CliLayer<Args> {
    pub fn from_args(args: Args) -> Self {
        Self(args)
    }
}

impl<Args: IntoIterator<Item: Into<OsString> + Clone>> Layer for CliLayer<Args> {
    type Err = clap::Error;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        OptionalConfig::try_parse_from(self.0)
    }

    fn build_error(err: Self::Err) -> BuildError {
        BuildError::Cli(err)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            ConfigBuilder,
            declaration::{OptionalKip71, OptionalParent},
        },
        clap::error::ErrorKind,
        magma_shared::BaseFee,
    };

    #[test]
    fn test_cli_layer_parses_arguments_successfully() {
        let layer = CliLayer(vec![
            "magma-fee",
            "--kip71.gas-target",
            "30000000",
            "--kip71.upper-bound-base-fee",
            "1000000000000000000000000000000000000000",
            "--parent.base-fee",
            "500000000000",
            "--blocks",
            "20",
        ]);
        let actual_config = layer.try_load().unwrap();
        let expected_config = OptionalConfig {
            kip71: Some(OptionalKip71 {
                gas_target: Some(30_000_000),
                upper_bound_base_fee: "1000000000000000000000000000000000000000".parse().ok(),
                ..Default::default()
            }),
            parent: Some(OptionalParent {
                base_fee: Some(BaseFee::from(500_000_000_000u64)),
                ..Default::default()
            }),
            blocks: Some(20),
            genesis: None,
        };

        assert_eq!(actual_config, expected_config);
    }

    #[test]
    fn test_cli_layer_rejects_non_decimal_base_fee() {
        let layer = CliLayer(vec!["magma-fee", "--parent.base-fee", "0x10"]);

        assert!(layer.try_load().is_err());
    }

    #[test]
    fn test_help_request_surfaces_as_cli_error() {
        let error = ConfigBuilder::new()
            .layer(CliLayer(vec!["magma-fee", "--help"]))
            .try_build()
            .unwrap_err();

        assert!(matches!(error, BuildError::Cli(e) if e.kind() == ErrorKind::DisplayHelp));
    }
}
