use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use registry::BindPolicy;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "MCSERVER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "server.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Block states document.
    pub blocks_path: PathBuf,
    /// Registries document holding the item and entity type catalogs.
    pub registries_path: PathBuf,
    /// Names the runtime catalogs are seeded with.
    pub names_path: PathBuf,
    /// Fail startup on registry entries without a runtime counterpart instead of skipping them.
    pub strict: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            blocks_path: PathBuf::from("registry/blocks.json"),
            registries_path: PathBuf::from("registry/registries.json"),
            names_path: PathBuf::from("registry/names.json"),
            strict: true,
        }
    }
}

impl ServerConfig {
    /// Loads the file named by `MCSERVER_CONFIG`, or `server.json` when unset.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(path)
    }

    /// Loads `path`, falling back to the defaults if it does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults.", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }

    pub fn bind_policy(&self) -> BindPolicy {
        if self.strict {
            BindPolicy::Strict
        } else {
            BindPolicy::Skip
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load_from(dir.path().join("server.json")).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_policy(), BindPolicy::Strict);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.json");
        fs::write(&path, r#"{ "blocks_path": "data/blocks.json", "strict": false }"#).unwrap();

        let config = ServerConfig::load_from(&path).unwrap();
        assert_eq!(config.blocks_path, PathBuf::from("data/blocks.json"));
        assert_eq!(config.registries_path, ServerConfig::default().registries_path);
        assert_eq!(config.bind_policy(), BindPolicy::Skip);
    }

    #[test]
    fn invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.json");
        fs::write(&path, r#"{ "strict": "yes" }"#).unwrap();

        assert!(matches!(
            ServerConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
