mod channel;
mod config;
mod registry;

pub use channel::{decode_registration, RegistrationMessage, REGISTER_WEAPONS_CHANNEL};
pub use config::{SourceConfig, StatFileConfig};
pub use registry::{LoadReport, MergeOutcome, WeaponRegistry};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading a weapon stat file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error decoding a cross-addon registration message
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Malformed registration payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
    #[error("Invalid weapon entry: {0}")]
    Validation(String),
}
