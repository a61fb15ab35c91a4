//! Weight initialization
//!
//! Each model kind names its own initialization: Xavier uniform weights with a
//! kind-specific gain and a constant bias fill.

use ndarray::{Array, Array1, ShapeBuilder};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const BIAS_FILL: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    HealthRisk,
    ImageClassifier,
}

impl ModelKind {
    ///
    /// The health regressor starts with deliberately small weights so the
    /// untrained network produces outputs close to sigmoid(bias).
    ///
    pub fn weight_gain(&self) -> f32 {
        match self {
            ModelKind::HealthRisk => 0.1,
            ModelKind::ImageClassifier => 1.0,
        }
    }

    pub fn bias_fill(&self) -> f32 {
        BIAS_FILL
    }

    pub fn weights<Sh, R>(
        &self,
        shape: Sh,
        fan_in: usize,
        fan_out: usize,
        rng: &mut R,
    ) -> Array<f32, Sh::Dim>
    where
        Sh: ShapeBuilder,
        R: Rng,
    {
        xavier_uniform(shape, fan_in, fan_out, self.weight_gain(), rng)
    }

    pub fn biases(&self, len: usize) -> Array1<f32> {
        Array1::from_elem(len, self.bias_fill())
    }
}

///
/// Samples from U(-a, a) with a = gain * sqrt(6 / (fan_in + fan_out)).
///
pub fn xavier_uniform<Sh, R>(
    shape: Sh,
    fan_in: usize,
    fan_out: usize,
    gain: f32,
    rng: &mut R,
) -> Array<f32, Sh::Dim>
where
    Sh: ShapeBuilder,
    R: Rng,
{
    let bound = xavier_bound(fan_in, fan_out, gain);
    Array::from_shape_simple_fn(shape, || rng.random_range(-bound..=bound))
}

pub fn xavier_bound(fan_in: usize, fan_out: usize, gain: f32) -> f32 {
    gain * (6.0 / (fan_in + fan_out) as f32).sqrt()
}
