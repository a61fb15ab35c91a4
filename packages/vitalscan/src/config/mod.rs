mod log;
mod models;
mod vitalscan;

pub use log::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use models::{ModelsConfig, TrainingConfig};
pub use vitalscan::VitalscanConfig;

pub(crate) use vitalscan::extract_field_name;

pub const VITALSCAN_PREFIX: &str = "VITALSCAN";
pub const DEFAULT_CONFIG_FILE_PATH: &str = "vitalscan.toml";
