//! Model lifecycle and inference
//!
//! The manager is built once per process from configuration and handed to the
//! CLI adapters. Cached artifacts are loaded when present, otherwise they are
//! created and written to the models directory.

use crate::config::{ModelsConfig, TrainingConfig};
use crate::error::Error;
use crate::imaging;
use crate::log::{MODELS, PREDICT};
use crate::patient::PatientFeatures;
use crate::prediction::{to_percentage, ImageAnalysis, RiskPrediction};
use crate::recommendation::{recommend, RiskScores};
use crate::store::ModelStore;
use ndarray::Array2;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};
use vitalscan_models::{
    synthetic, HealthPredictionModel, MedicalImageClassifier, ModelError, StandardScaler,
    TrainingOptions, FEATURE_COUNT,
};

#[derive(Debug)]
pub struct ModelManager {
    store: ModelStore,
    health: HealthPredictionModel,
    scaler: StandardScaler,
    image: MedicalImageClassifier,
}

impl ModelManager {
    pub fn init(config: &ModelsConfig) -> Result<Self, Error> {
        let store = ModelStore::open(&config.path)?;
        debug!(target: MODELS, msg = "Model store", path = %store.root().display());

        let (health, scaler) = if store.has_health_model() {
            info!(target: MODELS, msg = "Loading cached health model");
            (
                HealthPredictionModel::load(store.health_model_path())?,
                StandardScaler::load(store.scaler_path())?,
            )
        } else {
            let (health, scaler) = if config.training.enabled {
                train_health_model(config.seed, &config.training)?
            } else {
                fabricate_health_model(config.seed, config.scaler_samples)?
            };
            health.save(store.health_model_path())?;
            scaler.save(store.scaler_path())?;
            info!(target: MODELS, msg = "Saved health model", path = %store.health_model_path().display());
            (health, scaler)
        };

        let image = if store.has_image_model() {
            info!(target: MODELS, msg = "Loading cached image model");
            MedicalImageClassifier::load(store.image_model_path())?
        } else {
            // The classifier is initialized but never trained
            let image = MedicalImageClassifier::new(&mut StdRng::seed_from_u64(config.seed));
            image.save(store.image_model_path())?;
            info!(target: MODELS, msg = "Saved image model", path = %store.image_model_path().display());
            image
        };

        Ok(ModelManager {
            store,
            health,
            scaler,
            image,
        })
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn image_model(&self) -> &MedicalImageClassifier {
        &self.image
    }

    pub fn predict_health_risk(&self, features: &PatientFeatures) -> Result<RiskPrediction, Error> {
        let row = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_row().to_vec())
            .map_err(ModelError::from)?;

        let scaled = self.scaler.transform(&row)?;
        debug!(target: PREDICT, msg = "Scaled features", features = ?scaled.row(0).to_vec());

        let output = self.health.forward(&scaled.mapv(|v| v as f32))?;
        let scores = RiskScores {
            cardiovascular_risk: to_percentage(output[[0, 0]]),
            diabetes_risk: to_percentage(output[[0, 1]]),
            overall_health_score: to_percentage(output[[0, 2]]),
        };
        debug!(target: PREDICT, ?scores);

        Ok(RiskPrediction {
            cardiovascular_risk: scores.cardiovascular_risk,
            diabetes_risk: scores.diabetes_risk,
            overall_health_score: scores.overall_health_score,
            recommendations: recommend(features, &scores),
        })
    }

    ///
    /// Simulated analysis keyed on the filename. The image model is loaded
    /// but not run, see [`imaging`].
    ///
    pub fn analyze_image(&self, filename: &str, analysis_type: &str) -> ImageAnalysis {
        imaging::analyze(filename, analysis_type)
    }
}

/// Fits the scaler on synthetic data and keeps the initial weights.
fn fabricate_health_model(
    seed: u64,
    samples: usize,
) -> Result<(HealthPredictionModel, StandardScaler), Error> {
    let data = synthetic::generate(samples, seed)?;
    let mut scaler = StandardScaler::new();
    scaler.fit(&data.features)?;

    let health = HealthPredictionModel::new(&mut StdRng::seed_from_u64(seed));
    info!(target: MODELS, msg = "Initialized health model", parameters = health.num_parameters());

    Ok((health, scaler))
}

fn train_health_model(
    seed: u64,
    config: &TrainingConfig,
) -> Result<(HealthPredictionModel, StandardScaler), Error> {
    let data = synthetic::generate(config.samples, seed)?;
    let mut scaler = StandardScaler::new();
    let input = scaler.fit_transform(&data.features)?.mapv(|v| v as f32);
    let targets = data.targets.mapv(|v| v as f32);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut health = HealthPredictionModel::new(&mut rng);
    let options = TrainingOptions {
        epochs: config.epochs,
        learning_rate: config.learning_rate,
        log_every: config.log_every,
    };
    let losses = health.train(&input, &targets, options, &mut rng)?;
    info!(
        target: MODELS,
        msg = "Trained health model",
        samples = config.samples,
        final_loss = losses.last().copied()
    );

    Ok((health, scaler))
}
