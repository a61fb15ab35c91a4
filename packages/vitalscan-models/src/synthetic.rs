//! Synthetic patient data
//!
//! Generates a labelled dataset that ties the six physiological features to
//! cardiovascular risk, diabetes risk and an overall health score through a
//! fixed linear formula plus gaussian noise. The data is only used to fit the
//! feature scaler and, when enabled, to train the health regressor.

use crate::error::ModelError;
use crate::{FEATURE_COUNT, TARGET_COUNT};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub const DEFAULT_SEED: u64 = 42;

const LABEL_NOISE_STD: f64 = 0.05;

/// Normal distribution parameters and physiological bounds for one feature.
#[derive(Clone, Copy, Debug)]
pub struct FeatureSpec {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

pub const AGE: FeatureSpec = FeatureSpec {
    mean: 45.0,
    std: 15.0,
    min: 18.0,
    max: 85.0,
};

pub const SYSTOLIC_BP: FeatureSpec = FeatureSpec {
    mean: 120.0,
    std: 20.0,
    min: 80.0,
    max: 200.0,
};

pub const DIASTOLIC_BP: FeatureSpec = FeatureSpec {
    mean: 80.0,
    std: 15.0,
    min: 50.0,
    max: 120.0,
};

pub const BLOOD_SUGAR: FeatureSpec = FeatureSpec {
    mean: 100.0,
    std: 30.0,
    min: 70.0,
    max: 300.0,
};

pub const BMI: FeatureSpec = FeatureSpec {
    mean: 25.0,
    std: 5.0,
    min: 15.0,
    max: 50.0,
};

///
/// Feature matrix (samples x 6) in the order
/// age, gender, systolic, diastolic, blood sugar, bmi
/// and target matrix (samples x 3) in the order
/// cardiovascular risk, diabetes risk, overall health.
///
#[derive(Clone, Debug)]
pub struct SyntheticHealthData {
    pub features: Array2<f64>,
    pub targets: Array2<f64>,
}

impl SyntheticHealthData {
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }
}

///
/// Generates `samples` rows from a generator seeded with `seed`.
/// The same `samples` and `seed` always produce the same dataset.
///
pub fn generate(samples: usize, seed: u64) -> Result<SyntheticHealthData, ModelError> {
    let mut rng = StdRng::seed_from_u64(seed);

    let ages = sample_feature(&mut rng, AGE, samples)?;
    let genders: Array1<f64> = (0..samples)
        .map(|_| if rng.random_bool(0.5) { 1.0 } else { 0.0 })
        .collect();
    let systolic = sample_feature(&mut rng, SYSTOLIC_BP, samples)?;
    let diastolic = sample_feature(&mut rng, DIASTOLIC_BP, samples)?;
    let blood_sugar = sample_feature(&mut rng, BLOOD_SUGAR, samples)?;
    let bmi = sample_feature(&mut rng, BMI, samples)?;

    let age_factor = ages.mapv(|age| (age - AGE.min) / (AGE.max - AGE.min));
    let systolic_factor = systolic.mapv(|bp| unit((bp - 80.0) / 120.0));
    let diastolic_factor = diastolic.mapv(|bp| unit((bp - 50.0) / 70.0));
    let bmi_factor = bmi.mapv(|bmi| unit((bmi - 15.0) / 35.0));
    let sugar_factor = blood_sugar.mapv(|sugar| unit((sugar - 70.0) / 230.0));

    let cardio_risk = (0.3 * &age_factor
        + 0.25 * &systolic_factor
        + 0.25 * &diastolic_factor
        + 0.1 * &genders
        + 0.1 * &bmi_factor)
        .mapv(unit);

    let diabetes_risk =
        (0.2 * &age_factor + 0.4 * &sugar_factor + 0.3 * &bmi_factor + 0.1 * &systolic_factor)
            .mapv(unit);

    let overall_health = ((&cardio_risk + &diabetes_risk) / 2.0).mapv(|risk| unit(1.0 - risk));

    let noise = Normal::new(0.0, LABEL_NOISE_STD)?;
    let cardio_risk = cardio_risk.mapv(|v| unit(v + noise.sample(&mut rng)));
    let diabetes_risk = diabetes_risk.mapv(|v| unit(v + noise.sample(&mut rng)));
    let overall_health = overall_health.mapv(|v| unit(v + noise.sample(&mut rng)));

    let columns = [&ages, &genders, &systolic, &diastolic, &blood_sugar, &bmi];
    let features = Array2::from_shape_fn((samples, FEATURE_COUNT), |(i, j)| columns[j][i]);

    let labels = [&cardio_risk, &diabetes_risk, &overall_health];
    let targets = Array2::from_shape_fn((samples, TARGET_COUNT), |(i, j)| labels[j][i]);

    Ok(SyntheticHealthData { features, targets })
}

fn sample_feature(
    rng: &mut StdRng,
    spec: FeatureSpec,
    samples: usize,
) -> Result<Array1<f64>, ModelError> {
    let normal = Normal::new(spec.mean, spec.std)?;
    Ok((0..samples)
        .map(|_| normal.sample(rng).clamp(spec.min, spec.max))
        .collect())
}

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;

    #[test]
    fn same_seed_generates_same_data() {
        let a = generate(200, DEFAULT_SEED).unwrap();
        let b = generate(200, DEFAULT_SEED).unwrap();

        assert_eq!(a.features, b.features);
        assert_eq!(a.targets, b.targets);
    }

    #[test]
    fn different_seed_generates_different_data() {
        let a = generate(50, 1).unwrap();
        let b = generate(50, 2).unwrap();

        assert_ne!(a.features, b.features);
    }

    #[test]
    fn features_are_clipped_to_physiological_ranges() {
        let data = generate(2000, DEFAULT_SEED).unwrap();

        assert_eq!(data.features.dim(), (2000, FEATURE_COUNT));
        assert_eq!(data.targets.dim(), (2000, TARGET_COUNT));

        let specs = [
            (0, AGE),
            (2, SYSTOLIC_BP),
            (3, DIASTOLIC_BP),
            (4, BLOOD_SUGAR),
            (5, BMI),
        ];

        for (column, spec) in specs {
            for value in data.features.column(column) {
                assert!(*value >= spec.min && *value <= spec.max);
            }
        }

        for gender in data.features.column(1) {
            assert!(*gender == 0.0 || *gender == 1.0);
        }
    }

    #[test]
    fn targets_are_probabilities() {
        let data = generate(2000, DEFAULT_SEED).unwrap();

        for value in data.targets.iter() {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn older_patients_carry_more_cardiovascular_risk() {
        let data = generate(5000, DEFAULT_SEED).unwrap();

        let (mut young, mut old) = (Vec::new(), Vec::new());
        for (row, target) in data
            .features
            .axis_iter(Axis(0))
            .zip(data.targets.axis_iter(Axis(0)))
        {
            if row[0] < 35.0 {
                young.push(target[0]);
            } else if row[0] > 60.0 {
                old.push(target[0]);
            }
        }

        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert!(mean(&old) > mean(&young));
    }

    #[test]
    fn zero_samples_is_empty() {
        let data = generate(0, DEFAULT_SEED).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.len(), 0);
    }
}
