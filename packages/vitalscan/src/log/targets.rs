use crate::config::LogLevel;

// Define all log targets in one place
macro_rules! define_log_targets {
    ($(($const_name:ident, $field_name:ident, $target_str:literal)),* $(,)?) => {
        $(
            pub const $const_name: &str = $target_str;
        )*

        pub fn log_targets() -> Vec<&'static str> {
            vec![
                $(
                    $const_name,
                )*
            ]
        }

        pub fn log_level_for(config: &crate::config::LogConfig, target: &str) -> LogLevel {
            match target {
                $(
                    $const_name => config.$field_name,
                )*
                _ => config.level,
            }
        }

        // Fails to compile if LogConfig is missing a target field
        pub const fn validate_log_config_fields() {
            use crate::config::LogConfig;

            let _config = LogConfig {
                ansi_enabled: true,
                format: crate::config::LogFormat::Pretty,
                output: crate::config::LogOutput::Stderr,
                level: LogLevel::Info,
                $(
                    $field_name: LogLevel::Info,
                )*
            };
        }

        // LogConfig fields in config/log.rs must be kept in sync with the targets below.
        //
        // When adding a new target (NEWTARGET, new_target_level, "new_target"):
        // 1. Add the target to the define_log_targets! invocation below
        // 2. Add the field to LogConfig in config/log.rs:
        //    #[serde(default = "LogConfig::default_log_level")]
        //    pub new_target_level: LogLevel,
        // 3. Add the assignment to LogConfig::with_level:
        //    new_target_level: level,
    };
}

define_log_targets!(
    (CONFIG, config_level, "config"),
    (CLI, cli_level, "cli"),
    (MODELS, models_level, "models"),
    (TRAINING, training_level, "training"),
    (PREDICT, predict_level, "predict"),
    (IMAGING, imaging_level, "imaging"),
);

const _: () = validate_log_config_fields();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;

    #[cfg(feature = "ml")]
    #[test]
    fn training_target_matches_models_crate() {
        assert_eq!(TRAINING, vitalscan_models::TRAINING);
    }

    #[test]
    fn unknown_targets_use_the_default_level() {
        let mut config = LogConfig::with_level(LogLevel::Warn);
        config.imaging_level = LogLevel::Trace;

        assert_eq!(log_level_for(&config, IMAGING), LogLevel::Trace);
        assert_eq!(log_level_for(&config, PREDICT), LogLevel::Warn);
        assert_eq!(log_level_for(&config, "vitalscan::other"), LogLevel::Warn);
        assert_eq!(log_targets().len(), 6);
    }
}
