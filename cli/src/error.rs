use std::path::PathBuf;

use kwyd_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read battle script {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse battle script {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("agent '{0}' is declared more than once")]
    DuplicateAgent(String),

    #[error("event {event}: unknown agent '{agent}'")]
    UnknownAgent { event: u64, agent: String },

    #[error("event {event}: player_down needs an agent with main_agent = true")]
    NoMainAgent { event: u64 },

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("invalid settings override")]
    InvalidSettings(#[source] toml::de::Error),

    #[error("failed to serialize settings")]
    SerializeSettings(#[from] toml::ser::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
