//! Static responses used when the model path cannot run.
//!
//! Every failure still prints a well-formed JSON object on stdout.

use crate::prediction::{ImageAnalysis, RiskPrediction};
use serde::Serialize;

/// A fallback body with the reason it was returned.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorResponse<T> {
    pub error: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T> ErrorResponse<T> {
    pub fn new(error: impl Into<String>, body: T) -> Self {
        ErrorResponse {
            error: error.into(),
            body,
        }
    }
}

pub fn unavailable_message(reason: &str) -> String {
    format!("Import error: {reason}")
}

/// Returned with exit code 0 when the binary was built without model support.
pub fn health_unavailable(reason: &str) -> ErrorResponse<RiskPrediction> {
    ErrorResponse::new(
        unavailable_message(reason),
        RiskPrediction {
            cardiovascular_risk: 25.0,
            diabetes_risk: 20.0,
            overall_health_score: 75.0,
            recommendations: strings(&["Schedule health checkup", "Maintain healthy lifestyle"]),
        },
    )
}

pub fn health_error(error: impl Into<String>) -> ErrorResponse<RiskPrediction> {
    ErrorResponse::new(
        error,
        RiskPrediction {
            cardiovascular_risk: 30.0,
            diabetes_risk: 25.0,
            overall_health_score: 70.0,
            recommendations: strings(&["Consult healthcare provider", "Schedule regular checkups"]),
        },
    )
}

pub fn image_unavailable(reason: &str) -> ErrorResponse<ImageAnalysis> {
    ErrorResponse::new(
        unavailable_message(reason),
        ImageAnalysis {
            abnormality_detected: false,
            confidence: 0.85,
            findings: "Normal study. AI analysis temporarily unavailable.".to_string(),
            recommendations: strings(&["Manual review recommended", "Contact IT support"]),
        },
    )
}

pub fn image_error(error: impl Into<String>) -> ErrorResponse<ImageAnalysis> {
    ErrorResponse::new(
        error,
        ImageAnalysis {
            abnormality_detected: false,
            confidence: 0.80,
            findings: "Unable to complete AI analysis. Manual review required.".to_string(),
            recommendations: strings(&[
                "Radiologist review recommended",
                "Technical support needed",
            ]),
        },
    )
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
