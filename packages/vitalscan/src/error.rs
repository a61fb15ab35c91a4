use crate::config::extract_field_name;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[cfg(feature = "ml")]
    #[error(transparent)]
    Model(#[from] vitalscan_models::ModelError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value} for parameter {name}")]
    InvalidParameter { name: String, value: String },

    #[error("Missing field {name} from configuration file or environment")]
    MissingParameter { name: String },

    #[error(transparent)]
    FileOrEnvironment(#[from] config::ConfigError),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Expected exactly one JSON argument, received {received}")]
    ArgumentCount { received: usize },

    #[error("Missing required field: {name}")]
    MissingField { name: String },

    #[error("Invalid JSON input: {0}")]
    Parse(String),
}

impl InputError {
    ///
    /// Maps a request deserialization error to an input error.
    /// Missing fields are reported by name.
    ///
    pub fn from_json(err: serde_json::Error) -> Self {
        let message = err.to_string();
        if message.contains("missing field") {
            let name = extract_field_name(&message).unwrap_or_else(|| "unknown".to_string());
            return InputError::MissingField { name };
        }
        InputError::Parse(message)
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.into())
    }
}

impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Self {
        let message = e.to_string();
        let message = message.lines().next().unwrap_or_default();
        let message = message.trim_start_matches("error: ").to_string();
        Error::Input(InputError::Parse(message))
    }
}
