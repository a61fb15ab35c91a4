use super::{LogConfig, ModelsConfig, VITALSCAN_PREFIX};
use crate::cli::Args;
use crate::error::{ConfigError, Error};
use config::{Config, Environment};
use regex::Regex;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct VitalscanConfig {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Config defaults to a file called `vitalscan.toml` in the current directory.
/// Supports TOML and JSON.
/// Variable names should match the struct field names.
///
/// ENV vars can be used to override file settings.
///
/// ENV vars must be prefixed with `VITALSCAN_`.
///
impl VitalscanConfig {
    pub fn load(args: &Args) -> Result<VitalscanConfig, Error> {
        let mut config = VitalscanConfig::build(&args.config_file_path)?;

        // If log level is default, it has not been set by the user in config
        if config.log.level == LogConfig::default_log_level() {
            config.log.level = args.log_level;
        }

        // If log format is default, it has not been set by the user in config
        if config.log.format == LogConfig::default_log_format() {
            config.log.format = args.log_format;
        }

        Ok(config)
    }

    pub fn build(path: &str) -> Result<Self, Error> {
        // For parsing nested env values such as VITALSCAN_MODELS__PATH, VITALSCAN_LOG__LEVEL
        let env_source = Environment::with_prefix(VITALSCAN_PREFIX)
            .try_parsing(true)
            .separator("__")
            .prefix_separator("_");

        let config: Self = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env_source)
            .build()?
            .try_deserialize()
            .map_err(|err| match err {
                config::ConfigError::Message(ref s) => match s {
                    s if s.contains("missing field") => {
                        let name = extract_field_name(s).unwrap_or_else(|| "unknown".to_string());
                        ConfigError::MissingParameter { name }
                    }
                    s if s.contains("does not have variant constructor") => {
                        let (name, value) = extract_invalid_field(s);
                        ConfigError::InvalidParameter { name, value }
                    }
                    _ => err.into(),
                },
                _ => err.into(),
            })?;

        Ok(config)
    }
}

///
/// Extracts a field name (if present) from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `missing field`
///
/// Error string is "missing field `{name}`"
///
pub(crate) fn extract_field_name(input: &str) -> Option<String> {
    let re = Regex::new(r"`(\w+)`").ok()?;
    re.captures(input)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}

///
/// Extracts a field name and value from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `does not have variant constructor`
///
/// Error string is `enum {name} does not have variant constructor {value}`
///
fn extract_invalid_field(input: &str) -> (String, String) {
    let words = input.split(' ').collect::<Vec<_>>();

    let default_name = "unknown".to_string();
    let default_val = "".to_string();

    if !input.starts_with("enum") {
        return (default_name, default_val);
    }

    let name = words
        .get(1)
        .map_or(default_name.to_owned(), |w| w.to_string());

    let value = words
        .last()
        .map_or(default_val.to_owned(), |w| w.to_string());

    (name, value)
}
