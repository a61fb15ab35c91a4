//! Medical image classifier
//!
//! Four convolution blocks followed by a two layer classifier producing a
//! normal/abnormal probability distribution. The weights are initialized but
//! never trained, and image analysis does not run this network.

use crate::activation::Activation;
use crate::conv::{adaptive_avg_pool2d, max_pool2d, Conv2d};
use crate::error::ModelError;
use crate::init::ModelKind;
use crate::linear::Linear;
use crate::persist;
use ndarray::{Array2, Array4};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const INPUT_CHANNELS: usize = 3;
pub const NUM_CLASSES: usize = 2;
pub const CONV_CHANNELS: [usize; 4] = [32, 64, 128, 256];
pub const POOLED_SIDE: usize = 4;
pub const HIDDEN_UNITS: usize = 512;

const KERNEL_SIZE: usize = 3;
const PADDING: usize = 1;
const POOL_WINDOW: usize = 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalImageClassifier {
    features: Vec<Conv2d>,
    hidden: Linear,
    output: Linear,
}

impl MedicalImageClassifier {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_classes(NUM_CLASSES, rng)
    }

    pub fn with_classes<R: Rng>(num_classes: usize, rng: &mut R) -> Self {
        let kind = ModelKind::ImageClassifier;

        let mut features = Vec::with_capacity(CONV_CHANNELS.len());
        let mut channels = INPUT_CHANNELS;
        for &out_channels in CONV_CHANNELS.iter() {
            features.push(Conv2d::new(
                kind,
                channels,
                out_channels,
                KERNEL_SIZE,
                PADDING,
                rng,
            ));
            channels = out_channels;
        }

        let flattened = channels * POOLED_SIDE * POOLED_SIDE;

        MedicalImageClassifier {
            features,
            hidden: Linear::new(kind, flattened, HIDDEN_UNITS, rng),
            output: Linear::new(kind, HIDDEN_UNITS, num_classes, rng),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.output.output_size()
    }

    pub fn num_parameters(&self) -> usize {
        self.features
            .iter()
            .map(Conv2d::num_parameters)
            .sum::<usize>()
            + self.hidden.num_parameters()
            + self.output.num_parameters()
    }

    ///
    /// Inference over a `(batch, 3, height, width)` tensor.
    /// Returns class probabilities of shape `(batch, num_classes)`.
    ///
    /// The first three blocks halve the spatial size, so inputs should be at
    /// least 8 pixels on each side.
    ///
    pub fn forward(&self, images: &Array4<f32>) -> Result<Array2<f32>, ModelError> {
        let last = self.features.len().saturating_sub(1);

        let mut x = images.to_owned();
        for (i, conv) in self.features.iter().enumerate() {
            x = Activation::Relu.forward(&conv.forward(&x)?);
            x = if i == last {
                adaptive_avg_pool2d(&x, POOLED_SIDE, POOLED_SIDE)
            } else {
                max_pool2d(&x, POOL_WINDOW)
            };
        }

        let (batch, channels, height, width) = x.dim();
        let flat = x.into_shape_with_order((batch, channels * height * width))?;

        let hidden = Activation::Relu.forward(&self.hidden.forward(&flat)?);
        Ok(Activation::Softmax.forward(&self.output.forward(&hidden)?))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        persist::save_weights(path, self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        persist::load_weights(path)
    }
}
