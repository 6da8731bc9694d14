use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CACHED_DISPATCH_";

#[derive(Serialize, Debug, Deserialize, PartialEq, Clone)]
pub struct TransportConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            max_redirects: 5,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Serialize, Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    File,
}

#[derive(Serialize, Debug, Deserialize, PartialEq, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Only used by the file backend.
    pub directory: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            backend: CacheBackend::Memory,
            directory: std::env::temp_dir().join("cached_dispatch"),
        }
    }
}

#[derive(Serialize, Debug, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub transport: TransportConfig,
    pub cache: CacheConfig,
    /// log4rs YAML file; a console logger is used when absent.
    pub log_config: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transport: TransportConfig::default(),
            cache: CacheConfig::default(),
            log_config: None,
            log_level: String::from("info"),
        }
    }
}

impl Config {
    /// Defaults, overridden by the YAML file (when it exists), overridden by
    /// `CACHED_DISPATCH_*` variables with `__` separating nested keys.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: &Path) -> Result<Config, figment::Error> {
        Config::figment(path).extract()
    }
}
