use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Scaler must be fitted before transforming features")]
    ScalerNotFitted,

    #[error("Scaler cannot be fitted on an empty dataset")]
    EmptyDataset,

    #[error("Expected {expected} features, received {received}")]
    FeatureCount { expected: usize, received: usize },

    #[error("Expected input of shape {expected:?}, received {received:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        received: Vec<usize>,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid sampling distribution: {0}")]
    Distribution(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Model weights could not be encoded or decoded: {0}")]
    Encode(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<rand_distr::NormalError> for ModelError {
    fn from(e: rand_distr::NormalError) -> Self {
        ModelError::Distribution(e.to_string())
    }
}
