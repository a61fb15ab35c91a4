//! Simulated image analysis
//!
//! No pixels are read. The outcome is drawn from a generator seeded with the
//! MD5 digest of the filename, so the same filename always yields the same
//! result. This stands in for inference with the image classifier.

use crate::error::InputError;
use crate::log::IMAGING;
use crate::prediction::ImageAnalysis;
use md5::{Digest, Md5};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

pub const BASE_CONFIDENCE: f64 = 0.85;
pub const CONFIDENCE_SPREAD: f64 = 0.15;
pub const ABNORMALITY_RATE: f64 = 0.2;

pub const NORMAL_RECOMMENDATIONS: [&str; 3] = [
    "Continue routine monitoring",
    "No immediate action required",
    "Maintain regular health checkups",
];

/// Request body accepted by `image_analysis`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub filename: String,
    pub analysis_type: String,
}

impl ImageRequest {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        serde_json::from_str(input).map_err(InputError::from_json)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisType {
    Xray,
    Ct,
    Mri,
    Ultrasound,
    Other(String),
}

impl From<&str> for AnalysisType {
    /// Matching is exact, `"XRay"` is not `xray`.
    fn from(s: &str) -> Self {
        match s {
            "xray" => AnalysisType::Xray,
            "ct" => AnalysisType::Ct,
            "mri" => AnalysisType::Mri,
            "ultrasound" => AnalysisType::Ultrasound,
            other => AnalysisType::Other(other.to_string()),
        }
    }
}

impl AnalysisType {
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisType::Xray => "xray",
            AnalysisType::Ct => "ct",
            AnalysisType::Mri => "mri",
            AnalysisType::Ultrasound => "ultrasound",
            AnalysisType::Other(other) => other,
        }
    }

    pub fn abnormal_findings(&self) -> &'static str {
        match self {
            AnalysisType::Xray => {
                "Mild opacity detected in lower lung field. Possible early infection or inflammation."
            }
            AnalysisType::Ct => {
                "Small density irregularity observed. Requires radiologist review for differential diagnosis."
            }
            AnalysisType::Mri => {
                "Minor signal variation detected in soft tissue. Clinical correlation recommended."
            }
            AnalysisType::Ultrasound => {
                "Echogenic focus identified. Further evaluation may be warranted."
            }
            AnalysisType::Other(_) => "Abnormal pattern detected requiring specialist review.",
        }
    }

    pub fn abnormal_recommendations(&self) -> &'static [&'static str] {
        match self {
            AnalysisType::Xray => &[
                "Follow-up imaging in 2-4 weeks",
                "Clinical correlation with symptoms",
                "Consider antibiotic treatment if indicated",
            ],
            AnalysisType::Ct => &[
                "Radiologist consultation recommended",
                "Consider follow-up CT in 3-6 months",
                "Clinical evaluation for symptoms",
            ],
            AnalysisType::Mri => &[
                "Neurologist consultation if neurological symptoms",
                "Repeat MRI in 6 months",
                "Monitor for clinical changes",
            ],
            AnalysisType::Ultrasound => &[
                "Clinical correlation recommended",
                "Consider additional imaging modalities",
                "Follow-up ultrasound in 3 months",
            ],
            AnalysisType::Other(_) => &[
                "Specialist consultation recommended",
                "Clinical correlation advised",
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    pub confidence: f64,
    pub abnormal: bool,
}

/// First eight bytes of the MD5 digest, big endian.
pub fn filename_seed(filename: &str) -> u64 {
    let digest = Md5::digest(filename.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);

    debug!(target: IMAGING, msg = "Filename digest", filename, digest = hex::encode(digest));

    u64::from_be_bytes(bytes)
}

pub fn outcome(filename: &str) -> Outcome {
    let mut rng = StdRng::seed_from_u64(filename_seed(filename));

    let confidence = BASE_CONFIDENCE + rng.random::<f64>() * CONFIDENCE_SPREAD;
    let abnormal = rng.random::<f64>() < ABNORMALITY_RATE;

    Outcome {
        confidence,
        abnormal,
    }
}

pub fn report(analysis_type: &AnalysisType, outcome: Outcome) -> ImageAnalysis {
    let (findings, recommendations) = if outcome.abnormal {
        (
            analysis_type.abnormal_findings().to_string(),
            analysis_type.abnormal_recommendations(),
        )
    } else {
        (
            format!(
                "Normal {} study. No acute abnormalities detected.",
                analysis_type.as_str()
            ),
            &NORMAL_RECOMMENDATIONS[..],
        )
    };

    ImageAnalysis {
        abnormality_detected: outcome.abnormal,
        confidence: outcome.confidence,
        findings,
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn analyze(filename: &str, analysis_type: &str) -> ImageAnalysis {
    let outcome = outcome(filename);
    debug!(
        target: IMAGING,
        msg = "Simulated analysis",
        filename,
        analysis_type,
        abnormal = outcome.abnormal,
        confidence = outcome.confidence
    );
    report(&AnalysisType::from(analysis_type), outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_filename_same_result() {
        let first = analyze("chest-0142.png", "xray");
        let second = analyze("chest-0142.png", "xray");

        assert_eq!(first, second);
    }

    #[test]
    fn confidence_is_within_band() {
        for i in 0..200 {
            let outcome = outcome(&format!("scan-{i}.dcm"));
            let band = BASE_CONFIDENCE..BASE_CONFIDENCE + CONFIDENCE_SPREAD;
            assert!(band.contains(&outcome.confidence));
        }
    }

    #[test]
    fn different_filenames_differ() {
        let outcomes: Vec<_> = (0..200).map(|i| outcome(&format!("scan-{i}.dcm"))).collect();

        assert!(outcomes.iter().any(|o| o.abnormal));
        assert!(outcomes.iter().any(|o| !o.abnormal));
        assert!(outcomes.windows(2).any(|w| w[0].confidence != w[1].confidence));
    }

    #[test]
    fn abnormal_xray_uses_xray_findings() {
        let filename = (0..500)
            .map(|i| format!("test-{i}.png"))
            .find(|f| outcome(f).abnormal)
            .unwrap();

        let result = analyze(&filename, "xray");

        assert!(result.abnormality_detected);
        assert_eq!(
            result.findings,
            "Mild opacity detected in lower lung field. Possible early infection or inflammation."
        );
        assert_eq!(
            result.recommendations,
            vec![
                "Follow-up imaging in 2-4 weeks",
                "Clinical correlation with symptoms",
                "Consider antibiotic treatment if indicated"
            ]
        );
    }

    #[test]
    fn normal_study_names_the_type() {
        let outcome = Outcome {
            confidence: 0.9,
            abnormal: false,
        };

        let result = report(&AnalysisType::from("ct"), outcome);

        assert_eq!(result.findings, "Normal ct study. No acute abnormalities detected.");
        assert_eq!(result.recommendations, NORMAL_RECOMMENDATIONS);
    }

    #[test]
    fn unknown_type_uses_generic_findings() {
        let outcome = Outcome {
            confidence: 0.9,
            abnormal: true,
        };

        let result = report(&AnalysisType::from("XRAY"), outcome);

        assert_eq!(result.findings, "Abnormal pattern detected requiring specialist review.");
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn seed_is_stable() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(filename_seed(""), 0xd41d8cd98f00b204);
    }

    #[test]
    fn missing_analysis_type_is_named() {
        let err = ImageRequest::parse(r#"{"filename":"a.png"}"#).unwrap_err();

        assert!(matches!(err, InputError::MissingField { ref name } if name == "analysisType"));
    }
}
