//! Health risk prediction and simulated medical image analysis.
//!
//! The `health_prediction` and `image_analysis` binaries each read one JSON
//! request and print one JSON response. Model support is behind the `ml`
//! feature. Without it both binaries answer with a static fallback.

pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod imaging;
pub mod log;
pub mod patient;
pub mod prediction;
pub mod recommendation;

#[cfg(feature = "ml")]
pub mod manager;
#[cfg(feature = "ml")]
pub mod store;

pub use crate::cli::Args;
pub use crate::config::VitalscanConfig;
pub use crate::error::Error;

#[cfg(feature = "ml")]
pub use crate::manager::ModelManager;

#[cfg(test)]
mod test_helpers;
