//! Patient input for health risk prediction

use crate::error::InputError;
use crate::log::PREDICT;
use serde::Deserialize;
use std::ops::RangeInclusive;
use tracing::warn;

pub const AGE_RANGE: RangeInclusive<f64> = 18.0..=85.0;
pub const SYSTOLIC_BP_RANGE: RangeInclusive<f64> = 80.0..=200.0;
pub const DIASTOLIC_BP_RANGE: RangeInclusive<f64> = 50.0..=120.0;
pub const BLOOD_SUGAR_RANGE: RangeInclusive<f64> = 70.0..=300.0;
pub const BMI_RANGE: RangeInclusive<f64> = 15.0..=50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Numeric encoding used by the model
    pub fn encode(self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }

    /// `male` or `female`, ignoring case
    pub fn recognise(label: &str) -> Option<Gender> {
        match label.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

///
/// Request body accepted by `health_prediction`.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRequest {
    pub age: f64,
    pub gender: String,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: f64,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: f64,
    pub blood_sugar: f64,
    pub bmi: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatientFeatures {
    pub age: f64,
    pub gender: Gender,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub blood_sugar: f64,
    pub bmi: f64,
}

impl HealthRequest {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        serde_json::from_str(input).map_err(InputError::from_json)
    }

    ///
    /// Any gender other than `male` is encoded as female. Unrecognised labels
    /// and out of range values are logged, not rejected.
    ///
    pub fn features(&self) -> PatientFeatures {
        let gender = Gender::recognise(&self.gender).unwrap_or_else(|| {
            warn!(
                target: PREDICT,
                msg = "Unrecognised gender, encoded as female",
                gender = %self.gender
            );
            Gender::Female
        });

        let features = PatientFeatures {
            age: self.age,
            gender,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            blood_sugar: self.blood_sugar,
            bmi: self.bmi,
        };
        features.warn_out_of_range();
        features
    }
}

impl PatientFeatures {
    /// Column order matches the synthetic training data.
    pub fn to_row(&self) -> [f64; 6] {
        [
            self.age,
            self.gender.encode(),
            self.systolic_bp,
            self.diastolic_bp,
            self.blood_sugar,
            self.bmi,
        ]
    }

    /// Names of fields outside the range seen in training
    pub fn out_of_range(&self) -> Vec<&'static str> {
        [
            ("age", self.age, AGE_RANGE),
            ("systolicBP", self.systolic_bp, SYSTOLIC_BP_RANGE),
            ("diastolicBP", self.diastolic_bp, DIASTOLIC_BP_RANGE),
            ("bloodSugar", self.blood_sugar, BLOOD_SUGAR_RANGE),
            ("bmi", self.bmi, BMI_RANGE),
        ]
        .into_iter()
        .filter(|(_, value, range)| !range.contains(value))
        .map(|(name, _, _)| name)
        .collect()
    }

    fn warn_out_of_range(&self) {
        for field in self.out_of_range() {
            warn!(target: PREDICT, msg = "Input outside the expected range", field);
        }
    }
}
