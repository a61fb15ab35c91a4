//! Advisory messages for a health risk prediction
//!
//! Rules are evaluated in order over the raw inputs and the computed
//! percentages. Every rule that matches contributes its message.

use crate::patient::PatientFeatures;

pub const BLOOD_PRESSURE: &str = "Monitor blood pressure regularly and consider lifestyle changes";
pub const BLOOD_SUGAR: &str = "Consult endocrinologist for diabetes management";
pub const WEIGHT: &str = "Consider weight management program";
pub const CARDIOVASCULAR: &str = "High cardiovascular risk - schedule cardiac evaluation";
pub const DIABETES: &str = "High diabetes risk - implement preventive measures";
pub const CHECKUP: &str = "Schedule comprehensive health checkup";

pub const HEALTHY: [&str; 2] = [
    "Maintain current healthy lifestyle",
    "Schedule regular preventive checkups",
];

/// Computed percentages in [0, 100]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskScores {
    pub cardiovascular_risk: f64,
    pub diabetes_risk: f64,
    pub overall_health_score: f64,
}

pub fn recommend(features: &PatientFeatures, scores: &RiskScores) -> Vec<String> {
    let rules = [
        (
            features.systolic_bp > 140.0 || features.diastolic_bp > 90.0,
            BLOOD_PRESSURE,
        ),
        (features.blood_sugar > 126.0, BLOOD_SUGAR),
        (features.bmi > 30.0, WEIGHT),
        (scores.cardiovascular_risk > 60.0, CARDIOVASCULAR),
        (scores.diabetes_risk > 60.0, DIABETES),
        (scores.overall_health_score < 60.0, CHECKUP),
    ];

    let recommendations: Vec<String> = rules
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, message)| message.to_string())
        .collect();

    if recommendations.is_empty() {
        return HEALTHY.iter().map(|s| s.to_string()).collect();
    }
    recommendations
}
