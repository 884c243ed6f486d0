use crate::{error::{NetError, Result}, layers::dense::Layer, math::matrix::Matrix};

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update to a layer from gradients summed over
    /// `batch_size` samples: `p <- p - (learning_rate / batch_size) * grad`.
    pub fn step(&self, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &[f64], batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(NetError::Configuration("batch size must be at least 1".to_owned()));
        }
        let rate = self.learning_rate / batch_size as f64;
        layer.apply_gradients(weights_grad, biases_grad, rate)
    }
}
