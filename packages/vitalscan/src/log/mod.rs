mod subscriber;
mod targets;

use crate::config::{LogConfig, LogFormat};
use std::sync::Once;
use tracing_subscriber::{
    fmt::{
        format::{DefaultFields, Format},
        writer::BoxMakeWriter,
        SubscriberBuilder,
    },
    EnvFilter,
};

// Log targets used like `debug!(target: PREDICT, "Scaled features");`
// New targets are added in targets.rs and need a matching LogConfig field.
pub use targets::{
    log_level_for, log_targets, CLI, CONFIG, IMAGING, MODELS, PREDICT, TRAINING,
};

static INIT: Once = Once::new();

type Subscriber = Box<dyn tracing::Subscriber + Send + Sync>;

///
/// Installs the global subscriber. Later calls are ignored.
///
/// A subscriber installed elsewhere is left in place, the response on stdout
/// does not depend on logging.
///
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let subscriber = subscriber::builder(&config);
        let subscriber = set_format(&config, subscriber);

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("Could not set the tracing subscriber");
        }
    });
}

pub fn set_format(
    config: &LogConfig,
    builder: SubscriberBuilder<DefaultFields, Format, EnvFilter, BoxMakeWriter>,
) -> Subscriber {
    match &config.format {
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Structured => Box::new(builder.json().finish()),
        LogFormat::Text => Box::new(builder.finish()),
    }
}
