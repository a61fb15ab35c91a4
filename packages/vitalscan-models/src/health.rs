//! Health risk regressor
//!
//! Feed-forward network mapping six standardized patient features to three
//! sigmoid outputs: cardiovascular risk, diabetes risk and overall health.
//! Hidden layers use ReLU with dropout, which is only active while training.

use crate::activation::Activation;
use crate::error::ModelError;
use crate::init::ModelKind;
use crate::linear::Linear;
use crate::optimizer::{Adam, LayerGradients};
use crate::persist;
use crate::{FEATURE_COUNT, TARGET_COUNT, TRAINING};
use ndarray::{Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const HIDDEN_SIZES: [usize; 3] = [64, 32, 16];
pub const DROPOUT: f32 = 0.2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthPredictionModel {
    /// Hidden layers followed by the output layer.
    layers: Vec<Linear>,
    dropout: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingOptions {
    pub epochs: usize,
    pub learning_rate: f32,
    /// Log the loss every `log_every` epochs
    pub log_every: usize,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        TrainingOptions {
            epochs: 50,
            learning_rate: 0.001,
            log_every: 10,
        }
    }
}

/// Intermediate values of a training forward pass, kept for backpropagation.
struct Trace {
    /// Input to each layer
    inputs: Vec<Array2<f32>>,
    /// Pre-activation of each hidden layer
    hidden: Vec<Array2<f32>>,
    masks: Vec<Array2<f32>>,
    output: Array2<f32>,
}

impl HealthPredictionModel {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_layers(FEATURE_COUNT, &HIDDEN_SIZES, TARGET_COUNT, rng)
    }

    pub fn with_layers<R: Rng>(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        rng: &mut R,
    ) -> Self {
        let kind = ModelKind::HealthRisk;

        let mut layers = Vec::with_capacity(hidden_sizes.len() + 1);
        let mut previous = input_size;
        for &size in hidden_sizes {
            layers.push(Linear::new(kind, previous, size, rng));
            previous = size;
        }
        layers.push(Linear::new(kind, previous, output_size, rng));

        HealthPredictionModel {
            layers,
            dropout: DROPOUT,
        }
    }

    pub fn layers(&self) -> &[Linear] {
        &self.layers
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(Linear::num_parameters).sum()
    }

    ///
    /// Inference pass. Dropout is disabled and every output is in [0, 1].
    ///
    pub fn forward(&self, input: &Array2<f32>) -> Result<Array2<f32>, ModelError> {
        let mut activations = input.to_owned();
        for (i, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&activations)?;
            activations = self.activation(i).forward(&z);
        }
        Ok(activations)
    }

    /// Mean squared error over every output.
    pub fn loss(&self, input: &Array2<f32>, targets: &Array2<f32>) -> Result<f32, ModelError> {
        let predictions = self.forward(input)?;
        mse(&predictions, targets)
    }

    ///
    /// Full batch training with Adam on mean squared error.
    /// Returns the training loss of each epoch.
    ///
    pub fn train<R: Rng>(
        &mut self,
        input: &Array2<f32>,
        targets: &Array2<f32>,
        options: TrainingOptions,
        rng: &mut R,
    ) -> Result<Vec<f32>, ModelError> {
        let mut optimizer = Adam::new(options.learning_rate);
        let mut losses = Vec::with_capacity(options.epochs);

        for epoch in 0..options.epochs {
            let trace = self.forward_train(input, rng)?;
            let loss = mse(&trace.output, targets)?;
            let gradients = self.backward(&trace, targets);
            optimizer.step(&mut self.layers, &gradients);

            if options.log_every > 0 && epoch % options.log_every == 0 {
                info!(target: TRAINING, msg = "Training health model", epoch, loss);
            }
            losses.push(loss);
        }

        debug!(
            target: TRAINING,
            msg = "Health model training finished",
            epochs = options.epochs,
            parameters = self.num_parameters()
        );

        Ok(losses)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        persist::save_weights(path, self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        persist::load_weights(path)
    }

    fn activation(&self, index: usize) -> Activation {
        if index + 1 == self.layers.len() {
            Activation::Sigmoid
        } else {
            Activation::Relu
        }
    }

    fn forward_train<R: Rng>(
        &self,
        input: &Array2<f32>,
        rng: &mut R,
    ) -> Result<Trace, ModelError> {
        let keep = 1.0 - self.dropout;
        let hidden_count = self.layers.len().saturating_sub(1);

        let mut trace = Trace {
            inputs: Vec::with_capacity(self.layers.len()),
            hidden: Vec::with_capacity(hidden_count),
            masks: Vec::with_capacity(hidden_count),
            output: Array2::zeros((0, 0)),
        };

        let mut activations = input.to_owned();
        for (i, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&activations)?;
            trace.inputs.push(activations);

            if i < hidden_count {
                let mask = Array2::from_shape_simple_fn(z.dim(), || {
                    if rng.random::<f32>() < keep {
                        1.0 / keep
                    } else {
                        0.0
                    }
                });
                activations = Activation::Relu.forward(&z) * &mask;
                trace.hidden.push(z);
                trace.masks.push(mask);
            } else {
                activations = Activation::Sigmoid.forward(&z);
            }
        }

        trace.output = activations;
        Ok(trace)
    }

    fn backward(&self, trace: &Trace, targets: &Array2<f32>) -> Vec<LayerGradients> {
        let n = trace.output.len() as f32;
        let last = self.layers.len() - 1;
        let mut gradients = Vec::with_capacity(self.layers.len());

        let grad_output = (&trace.output - targets) * (2.0 / n);
        let mut delta =
            grad_output * Activation::Sigmoid.derivative(&trace.output, &trace.output);

        gradients.push((
            trace.inputs[last].t().dot(&delta),
            delta.sum_axis(Axis(0)),
        ));
        let mut upstream = delta.dot(&self.layers[last].weights.t());

        for i in (0..last).rev() {
            let z = &trace.hidden[i];
            delta = (upstream * &trace.masks[i]) * Activation::Relu.derivative(z, z);

            gradients.push((trace.inputs[i].t().dot(&delta), delta.sum_axis(Axis(0))));
            upstream = delta.dot(&self.layers[i].weights.t());
        }

        gradients.reverse();
        gradients
    }
}

fn mse(predictions: &Array2<f32>, targets: &Array2<f32>) -> Result<f32, ModelError> {
    if predictions.dim() != targets.dim() {
        return Err(ModelError::ShapeMismatch {
            expected: predictions.shape().to_vec(),
            received: targets.shape().to_vec(),
        });
    }
    let diff = predictions - targets;
    Ok(diff.mapv(|d| d * d).mean().unwrap_or(0.0))
}
