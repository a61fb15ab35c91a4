use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_MODELS_PATH: &str = "models";

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ModelsConfig {
    /// Directory holding cached weights and the fitted scaler
    #[serde(default = "ModelsConfig::default_path")]
    pub path: PathBuf,

    /// Seeds synthetic data and weight initialization
    #[serde(default = "ModelsConfig::default_seed")]
    pub seed: u64,

    /// Synthetic samples used to fit the scaler when no cached scaler exists
    #[serde(default = "ModelsConfig::default_scaler_samples")]
    pub scaler_samples: usize,

    #[serde(default)]
    pub training: TrainingConfig,
}

///
/// Training replaces weight fabrication when no cached health model exists.
/// Disabled by default.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TrainingConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "TrainingConfig::default_samples")]
    pub samples: usize,

    #[serde(default = "TrainingConfig::default_epochs")]
    pub epochs: usize,

    #[serde(default = "TrainingConfig::default_learning_rate")]
    pub learning_rate: f32,

    #[serde(default = "TrainingConfig::default_log_every")]
    pub log_every: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        ModelsConfig {
            path: ModelsConfig::default_path(),
            seed: ModelsConfig::default_seed(),
            scaler_samples: ModelsConfig::default_scaler_samples(),
            training: TrainingConfig::default(),
        }
    }
}

impl ModelsConfig {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        ModelsConfig {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_MODELS_PATH)
    }

    pub const fn default_seed() -> u64 {
        42
    }

    pub const fn default_scaler_samples() -> usize {
        1000
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            enabled: false,
            samples: TrainingConfig::default_samples(),
            epochs: TrainingConfig::default_epochs(),
            learning_rate: TrainingConfig::default_learning_rate(),
            log_every: TrainingConfig::default_log_every(),
        }
    }
}

impl TrainingConfig {
    pub const fn default_samples() -> usize {
        10_000
    }

    pub const fn default_epochs() -> usize {
        50
    }

    pub const fn default_learning_rate() -> f32 {
        0.001
    }

    pub const fn default_log_every() -> usize {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ModelsConfig::default();

        assert_eq!(config.path, PathBuf::from("models"));
        assert_eq!(config.seed, 42);
        assert_eq!(config.scaler_samples, 1000);
        assert!(!config.training.enabled);
        assert_eq!(config.training.samples, 10_000);
        assert_eq!(config.training.epochs, 50);
    }

    #[test]
    fn with_path_keeps_other_defaults() {
        let config = ModelsConfig::with_path("/tmp/vitalscan");

        assert_eq!(config.path, PathBuf::from("/tmp/vitalscan"));
        assert_eq!(config.seed, ModelsConfig::default_seed());
    }
}
