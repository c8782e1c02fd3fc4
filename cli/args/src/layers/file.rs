use {
    crate::{
        declaration::{OptionalConfig, OptionalKip71},
        stack::Layer,
    },
    magma_genesis::Kip71Parameters,
    serde::de::Error as _,
    std::{
        error::Error as StdError,
        fs,
        io::{self, ErrorKind},
        path::Path,
    },
};

pub const DEFAULT_CONFIG_FILE: &str = "Magma.toml";

/// Configuration read from a file. The parser receives the path and decides how to read it.
#[derive(Debug, Clone)]
pub struct FileLayer<Parser> {
    path: Box<Path>,
    parser: Parser,
}

impl<Parser> FileLayer<Parser> {
    pub fn new(path: impl AsRef<Path>, parser: Parser) -> Self {
        Self {
            path: path.as_ref().into(),
            parser,
        }
    }
}

type TomlParser = fn(Box<Path>) -> Result<OptionalConfig, toml::de::Error>;
type JsonParser = fn(Box<Path>) -> Result<OptionalConfig, serde_json::Error>;

impl FileLayer<TomlParser> {
    /// A full configuration in TOML. A missing file counts as an empty layer.
    pub fn toml(path: impl AsRef<Path>) -> Self {
        FileLayer::new(path, |path| {
            read_if_exists(&path)
                .map_err(toml::de::Error::custom)?
                .map_or_else(|| Ok(OptionalConfig::default()), |s| toml::from_str(&s))
        })
    }
}

impl FileLayer<JsonParser> {
    /// The fee market section of a JSON genesis file, which must exist.
    pub fn genesis_json(path: impl AsRef<Path>) -> Self {
        FileLayer::new(path, |path| {
            let json = fs::read_to_string(&path).map_err(serde_json::Error::custom)?;
            let params = parse_genesis_kip71(&json)?;

            Ok(OptionalConfig {
                kip71: Some(OptionalKip71::from(params)),
                ..Default::default()
            })
        })
    }
}

impl<F: FnOnce(Box<Path>) -> Result<OptionalConfig, Err>, Err: StdError + Send + Sync + 'static>
    Layer for FileLayer<F>
{
    type Err = Err;

    fn try_load(self) -> Result<OptionalConfig, Self::Err> {
        (self.parser)(self.path)
    }
}

fn read_if_exists(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// The fee market parameters sit under `config.kip71`, with the same keys as in `Magma.toml`.
/// Other genesis content is ignored.
fn parse_genesis_kip71(json: &str) -> Result<Kip71Parameters, serde_json::Error> {
    #[derive(serde::Deserialize)]
    struct Genesis {
        config: ChainConfig,
    }

    #[derive(serde::Deserialize)]
    struct ChainConfig {
        kip71: Kip71Parameters,
    }

    serde_json::from_str::<Genesis>(json).map(|genesis| genesis.config.kip71)
}
