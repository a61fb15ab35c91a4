//! Neural network models backing Vitalscan.
//!
//! Everything here is plain `ndarray` code: dense and convolutional layers,
//! explicit per-model initialization, Adam, a standard scaler and the
//! synthetic dataset the scaler is fitted on.

pub mod activation;
pub mod conv;
pub mod error;
pub mod health;
pub mod image;
pub mod init;
pub mod linear;
pub mod optimizer;
pub mod persist;
pub mod scaler;
pub mod synthetic;

pub use crate::error::ModelError;
pub use crate::health::{HealthPredictionModel, TrainingOptions};
pub use crate::image::MedicalImageClassifier;
pub use crate::init::ModelKind;
pub use crate::scaler::StandardScaler;
pub use crate::synthetic::SyntheticHealthData;

/// age, gender, systolic, diastolic, blood sugar, bmi
pub const FEATURE_COUNT: usize = 6;

/// cardiovascular risk, diabetes risk, overall health
pub const TARGET_COUNT: usize = 3;

/// Log target for training progress.
pub const TRAINING: &str = "training";
