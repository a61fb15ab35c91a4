use ndarray::{Array, Array2, Axis, Dimension};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Sigmoid,
    /// Normalizes each row into a probability distribution.
    Softmax,
}

impl Activation {
    pub fn forward<D: Dimension>(&self, x: &Array<f32, D>) -> Array<f32, D> {
        match self {
            Activation::Relu => x.mapv(relu),
            Activation::Sigmoid => x.mapv(sigmoid),
            Activation::Softmax => {
                let mut out = x.clone();
                let last = Axis(out.ndim().saturating_sub(1));
                for mut lane in out.lanes_mut(last) {
                    let max = lane.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
                    lane.mapv_inplace(|v| (v - max).exp());
                    let sum = lane.sum();
                    lane.mapv_inplace(|v| v / sum);
                }
                out
            }
        }
    }

    ///
    /// Derivative with respect to the pre-activation `z`, given the
    /// activation output `a = forward(z)`.
    /// Softmax is only ever used at inference time and is treated as identity.
    ///
    pub fn derivative(&self, z: &Array2<f32>, a: &Array2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Sigmoid => a.mapv(|v| v * (1.0 - v)),
            Activation::Softmax => Array2::ones(z.dim()),
        }
    }
}

pub fn relu(x: f32) -> f32 {
    x.max(0.0)
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn relu_zeroes_negatives() {
        let out = Activation::Relu.forward(&array![[-1.0_f32, 0.0, 2.5]]);
        assert_eq!(out, array![[0.0, 0.0, 2.5]]);
    }

    #[test]
    fn sigmoid_is_bounded() {
        let out = Activation::Sigmoid.forward(&array![[-100.0_f32, 0.0, 100.0]]);
        assert!(out.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(out[[0, 1]], 0.5);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let out = Activation::Softmax.forward(&array![[1.0_f32, 2.0], [1000.0, 1000.0]]);

        for row in out.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }
        assert!((out[[1, 0]] - 0.5).abs() < 1e-6);
    }
}
