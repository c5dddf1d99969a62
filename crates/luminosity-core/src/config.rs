use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the optional configuration file (`Luminosity.toml`,
/// `Luminosity.json`, ...), looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "Luminosity";

/// Prefix of environment overrides, e.g. `LUMINOSITY_OUTPUT_DIR`.
pub const ENV_PREFIX: &str = "LUMINOSITY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Glob patterns for paths the catalog search skips.
    pub ignore_patterns: Vec<String>,
    /// Also fetch collections when gathering stats.
    pub include_collections: bool,
    /// Default destination for extracted previews.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            ignore_patterns: Vec::new(),
            include_collections: false,
            output_dir: PathBuf::from("previews"),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("ignore_patterns")
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(CONFIG_FILE_NAME).required(false))
        .add_source(environment())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Loads an explicit configuration file, without environment overrides.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
