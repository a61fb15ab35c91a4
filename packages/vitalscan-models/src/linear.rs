use crate::error::ModelError;
use crate::init::ModelKind;
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fully connected layer computing `input . weights + biases`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    /// input_size x output_size
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

impl Linear {
    pub fn new<R: Rng>(
        kind: ModelKind,
        input_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Self {
        Linear {
            weights: kind.weights((input_size, output_size), input_size, output_size, rng),
            biases: kind.biases(output_size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn forward(&self, input: &Array2<f32>) -> Result<Array2<f32>, ModelError> {
        if input.ncols() != self.input_size() {
            return Err(ModelError::ShapeMismatch {
                expected: vec![input.nrows(), self.input_size()],
                received: input.shape().to_vec(),
            });
        }
        Ok(input.dot(&self.weights) + &self.biases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn forward_adds_bias() {
        let layer = Linear {
            weights: array![[1.0, 0.0], [0.0, 2.0]],
            biases: array![0.5, -0.5],
        };

        let out = layer.forward(&array![[1.0, 1.0], [2.0, 3.0]]).unwrap();
        assert_eq!(out, array![[1.5, 1.5], [2.5, 5.5]]);
    }

    #[test]
    fn forward_rejects_wrong_width() {
        let layer = Linear::new(ModelKind::HealthRisk, 6, 4, &mut StdRng::seed_from_u64(1));
        let result = layer.forward(&Array2::zeros((1, 5)));

        assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
    }

    #[test]
    fn parameter_count() {
        let layer = Linear::new(ModelKind::HealthRisk, 6, 64, &mut StdRng::seed_from_u64(1));
        assert_eq!(layer.num_parameters(), 6 * 64 + 64);
        assert_eq!(layer.input_size(), 6);
        assert_eq!(layer.output_size(), 64);
    }
}
