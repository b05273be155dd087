//! Configuration file of the command-line adapter.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tactics_core::Settings;
use tactics_system_input::KeyBindings;
use thiserror::Error;

/// Failures raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse configuration file {path}")]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Settings and key bindings read at start-up.
///
/// Missing sections fall back to their defaults. Bindings listed under
/// `[keys]` extend the default bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) settings: Settings,
    pub(crate) keys: KeyBindings,
}

impl CliConfig {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let parsed: Self = toml::from_str(contents)?;
        Ok(Self {
            keys: KeyBindings::default().merged(&parsed.keys),
            ..parsed
        })
    }
}
