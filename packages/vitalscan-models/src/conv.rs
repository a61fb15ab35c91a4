//! 2D convolution and pooling over `(batch, channels, height, width)` tensors.

use crate::error::ModelError;
use crate::init::ModelKind;
use ndarray::{s, Array1, Array2, Array4, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conv2d {
    /// out_channels x in_channels x kernel x kernel
    pub weights: Array4<f32>,
    pub biases: Array1<f32>,
    pub padding: usize,
}

impl Conv2d {
    pub fn new<R: Rng>(
        kind: ModelKind,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        padding: usize,
        rng: &mut R,
    ) -> Self {
        let receptive = kernel_size * kernel_size;
        Conv2d {
            weights: kind.weights(
                (out_channels, in_channels, kernel_size, kernel_size),
                in_channels * receptive,
                out_channels * receptive,
                rng,
            ),
            biases: kind.biases(out_channels),
            padding,
        }
    }

    pub fn in_channels(&self) -> usize {
        self.weights.dim().1
    }

    pub fn out_channels(&self) -> usize {
        self.weights.dim().0
    }

    pub fn kernel_size(&self) -> usize {
        self.weights.dim().2
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    ///
    /// Stride 1 convolution. Each image is unfolded into a
    /// `(in_channels * k * k, out_h * out_w)` patch matrix and multiplied by
    /// the flattened kernels.
    ///
    pub fn forward(&self, input: &Array4<f32>) -> Result<Array4<f32>, ModelError> {
        let (batch, channels, height, width) = input.dim();
        let k = self.kernel_size();
        let p = self.padding;

        if channels != self.in_channels() || height + 2 * p < k || width + 2 * p < k {
            let min_side = k.saturating_sub(2 * p);
            return Err(ModelError::ShapeMismatch {
                expected: vec![batch, self.in_channels(), min_side, min_side],
                received: input.shape().to_vec(),
            });
        }

        let out_h = height + 2 * p - k + 1;
        let out_w = width + 2 * p - k + 1;
        let out_channels = self.out_channels();

        let mut padded = Array4::<f32>::zeros((batch, channels, height + 2 * p, width + 2 * p));
        padded
            .slice_mut(s![.., .., p..p + height, p..p + width])
            .assign(input);

        let kernels = self
            .weights
            .view()
            .into_shape_with_order((out_channels, channels * k * k))?;
        let biases = self.biases.view().insert_axis(Axis(1));

        let mut output = Array4::<f32>::zeros((batch, out_channels, out_h, out_w));

        for b in 0..batch {
            let mut patches = Array2::<f32>::zeros((channels * k * k, out_h * out_w));
            for c in 0..channels {
                for ky in 0..k {
                    for kx in 0..k {
                        let row = (c * k + ky) * k + kx;
                        for y in 0..out_h {
                            for x in 0..out_w {
                                patches[[row, y * out_w + x]] = padded[[b, c, y + ky, x + kx]];
                            }
                        }
                    }
                }
            }

            let activations = kernels.dot(&patches) + &biases;
            output
                .slice_mut(s![b, .., .., ..])
                .assign(&activations.into_shape_with_order((out_channels, out_h, out_w))?);
        }

        Ok(output)
    }
}

/// Non-overlapping max pooling with a square window. Trailing rows and
/// columns that do not fill a window are dropped.
pub fn max_pool2d(input: &Array4<f32>, window: usize) -> Array4<f32> {
    let (batch, channels, height, width) = input.dim();
    let (out_h, out_w) = (height / window, width / window);

    Array4::from_shape_fn((batch, channels, out_h, out_w), |(b, c, y, x)| {
        input
            .slice(s![
                b,
                c,
                y * window..(y + 1) * window,
                x * window..(x + 1) * window
            ])
            .fold(f32::NEG_INFINITY, |acc, &v| acc.max(v))
    })
}

///
/// Averages over adaptive windows so that any input size maps to
/// `(out_h, out_w)`. Window `i` spans `floor(i * in / out)` to
/// `ceil((i + 1) * in / out)`, which also upsamples inputs smaller than the
/// output.
///
pub fn adaptive_avg_pool2d(input: &Array4<f32>, out_h: usize, out_w: usize) -> Array4<f32> {
    let (batch, channels, height, width) = input.dim();

    Array4::from_shape_fn((batch, channels, out_h, out_w), |(b, c, y, x)| {
        let (y0, y1) = adaptive_window(y, height, out_h);
        let (x0, x1) = adaptive_window(x, width, out_w);
        input
            .slice(s![b, c, y0..y1, x0..x1])
            .mean()
            .unwrap_or(0.0)
    })
}

fn adaptive_window(index: usize, input: usize, output: usize) -> (usize, usize) {
    let start = index * input / output;
    let end = ((index + 1) * input).div_ceil(output);
    (start, end)
}
