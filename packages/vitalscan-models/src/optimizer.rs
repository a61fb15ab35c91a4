use crate::linear::Linear;
use ndarray::{Array, Array1, Array2, Dimension, Zip};

/// Weight and bias gradients for one linear layer.
pub type LayerGradients = (Array2<f32>, Array1<f32>);

#[derive(Clone, Debug)]
struct Moments {
    weights: (Array2<f32>, Array2<f32>),
    biases: (Array1<f32>, Array1<f32>),
}

impl Moments {
    fn zeros_like(layer: &Linear) -> Self {
        Moments {
            weights: (
                Array2::zeros(layer.weights.dim()),
                Array2::zeros(layer.weights.dim()),
            ),
            biases: (
                Array1::zeros(layer.biases.dim()),
                Array1::zeros(layer.biases.dim()),
            ),
        }
    }
}

/// Adam with bias-corrected first and second moment estimates.
#[derive(Clone, Debug)]
pub struct Adam {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    step: i32,
    moments: Vec<Moments>,
}

impl Adam {
    pub fn new(learning_rate: f32) -> Self {
        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            step: 0,
            moments: Vec::new(),
        }
    }

    pub fn steps(&self) -> i32 {
        self.step
    }

    ///
    /// Applies one update to every layer. `gradients` must be in the same
    /// order as `layers`.
    ///
    pub fn step(&mut self, layers: &mut [Linear], gradients: &[LayerGradients]) {
        if self.moments.len() != layers.len() {
            self.moments = layers.iter().map(Moments::zeros_like).collect();
        }

        self.step += 1;
        let update = Update {
            learning_rate: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
            correction1: 1.0 - self.beta1.powi(self.step),
            correction2: 1.0 - self.beta2.powi(self.step),
        };

        for ((layer, (weight_grad, bias_grad)), moments) in layers
            .iter_mut()
            .zip(gradients)
            .zip(self.moments.iter_mut())
        {
            let (m, v) = &mut moments.weights;
            update.apply(&mut layer.weights, weight_grad, m, v);

            let (m, v) = &mut moments.biases;
            update.apply(&mut layer.biases, bias_grad, m, v);
        }
    }
}

#[derive(Clone, Copy)]
struct Update {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    correction1: f32,
    correction2: f32,
}

impl Update {
    fn apply<D: Dimension>(
        self,
        param: &mut Array<f32, D>,
        grad: &Array<f32, D>,
        m: &mut Array<f32, D>,
        v: &mut Array<f32, D>,
    ) {
        Zip::from(param)
            .and(grad)
            .and(m)
            .and(v)
            .for_each(|p, &g, m, v| {
                *m = self.beta1 * *m + (1.0 - self.beta1) * g;
                *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;
                let m_hat = *m / self.correction1;
                let v_hat = *v / self.correction2;
                *p -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
            });
    }
}
