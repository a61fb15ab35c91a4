mod health;
mod image;

use crate::{
    config::{LogConfig, LogFormat, LogLevel, DEFAULT_CONFIG_FILE_PATH},
    error::{Error, InputError},
    fallback::ErrorResponse,
    log::CLI,
};
use clap::{CommandFactory, FromArgMatches, Parser};
use serde::Serialize;
use std::ffi::OsString;
use std::io::Write;
use tracing::error;

#[cfg(feature = "ml")]
use crate::{config::VitalscanConfig, log::CONFIG, manager::ModelManager};
#[cfg(feature = "ml")]
use std::path::Path;
#[cfg(feature = "ml")]
use tracing::debug;

pub use health::HealthCommand;
pub use image::ImageCommand;

/// Exit code for malformed input and runtime failures
pub const FAILURE: i32 = 1;

pub const UNAVAILABLE_REASON: &str = "vitalscan was built without model support";

#[derive(Clone, Debug, Parser)]
#[command(version, about, verbatim_doc_comment)]
///
/// Vitalscan
///
/// Health risk prediction and simulated medical image analysis.
/// Reads one JSON request and prints one JSON response.
///
pub struct Args {
    /// JSON request. Exactly one is expected.
    pub input: Vec<String>,

    /// Optional path to a Vitalscan configuration file.
    ///
    /// Default is "vitalscan.toml".
    /// Configuration is loaded from this file, if present.
    /// Environment variables are used instead of the file or to override any values defined in the file.
    #[arg(short = 'p', long, default_value = DEFAULT_CONFIG_FILE_PATH, verbatim_doc_comment, global = true)]
    pub config_file_path: String,

    ///
    /// Optional log level.
    ///
    #[arg(short, long, value_enum, default_value_t = LogConfig::default_log_level(), env = "VITALSCAN_LOG__LEVEL", global = true)]
    pub log_level: LogLevel,

    ///
    /// Optional log format. Default is "pretty" if stderr is a terminal, otherwise "structured".
    ///
    #[arg(short='f', long, value_enum, default_value_t = LogConfig::default_log_format(), env = "VITALSCAN_LOG__FORMAT", global = true)]
    pub log_format: LogFormat,
}

impl Args {
    /// The single JSON request
    pub fn request(&self) -> Result<&str, InputError> {
        match self.input.as_slice() {
            [input] => Ok(input),
            other => Err(InputError::ArgumentCount {
                received: other.len(),
            }),
        }
    }
}

///
/// One command line entry point: how a request is handled and which static
/// payloads stand in when it cannot be.
///
pub trait Adapter {
    const NAME: &'static str;
    const ABOUT: &'static str;

    type Response: Serialize;

    fn unavailable(reason: &str) -> ErrorResponse<Self::Response>;

    fn error(message: String) -> ErrorResponse<Self::Response>;

    #[cfg(feature = "ml")]
    fn handle(manager: &ModelManager, request: &str) -> Result<Self::Response, Error>;
}

pub fn parse<A, I, T>(argv: I) -> Result<Args, clap::Error>
where
    A: Adapter,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Args::command()
        .name(A::NAME)
        .bin_name(A::NAME)
        .about(A::ABOUT)
        .try_get_matches_from(argv)?;
    Args::from_arg_matches(&matches)
}

///
/// Runs one request and writes the JSON response to `out`.
/// Returns the process exit code.
///
pub fn run<A, I, T>(argv: I, out: &mut impl Write) -> i32
where
    A: Adapter,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let parsed = match parse::<A, _, _>(argv) {
        // --help and --version
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return exitcode::OK;
        }
        parsed => parsed,
    };

    dispatch::<A>(parsed, out)
}

#[cfg(feature = "ml")]
fn dispatch<A: Adapter>(parsed: Result<Args, clap::Error>, out: &mut impl Write) -> i32 {
    match execute::<A>(parsed) {
        Ok(response) => respond(out, &response, exitcode::OK),
        Err(err) => {
            error!(target: CLI, msg = "Request failed", adapter = A::NAME, error = %err);
            respond(out, &A::error(err.to_string()), FAILURE)
        }
    }
}

#[cfg(not(feature = "ml"))]
fn dispatch<A: Adapter>(_parsed: Result<Args, clap::Error>, out: &mut impl Write) -> i32 {
    respond(out, &A::unavailable(UNAVAILABLE_REASON), exitcode::OK)
}

#[cfg(feature = "ml")]
fn execute<A: Adapter>(parsed: Result<Args, clap::Error>) -> Result<A::Response, Error> {
    let args = parsed?;
    let config = VitalscanConfig::load(&args)?;
    crate::log::init(config.log.clone());

    if !Path::new(&args.config_file_path).exists() {
        debug!(
            target: CONFIG,
            msg = "Configuration file was not found, using defaults and environment",
            path = args.config_file_path
        );
    }

    let request = args.request()?;
    debug!(target: CLI, msg = "Handling request", adapter = A::NAME);

    let manager = ModelManager::init(&config.models)?;
    A::handle(&manager, request)
}

fn respond<T: Serialize>(out: &mut impl Write, response: &T, code: i32) -> i32 {
    let written = serde_json::to_string(response)
        .map_err(Error::from)
        .and_then(|json| writeln!(out, "{json}").map_err(Error::from));

    match written {
        Ok(()) => code,
        Err(err) => {
            error!(target: CLI, msg = "Could not write response", error = %err);
            FAILURE
        }
    }
}
