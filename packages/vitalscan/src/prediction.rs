use serde::{Deserialize, Serialize};

/// Health risk percentages with advisory messages.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPrediction {
    pub cardiovascular_risk: f64,
    pub diabetes_risk: f64,
    pub overall_health_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub abnormality_detected: bool,
    pub confidence: f64,
    pub findings: String,
    pub recommendations: Vec<String>,
}

/// Converts a model output to a percentage, clamping to [0, 1] first.
pub fn to_percentage(probability: f32) -> f64 {
    f64::from(probability.clamp(0.0, 1.0)) * 100.0
}
