use rand::Rng;

use crate::activation::{sigmoid_prime_vec, sigmoid_vec};
use crate::error::Result;
use crate::math::{matrix::Matrix, vector};

/// One fully-connected sigmoid layer.
///
/// Besides its parameters the layer keeps the weighted input `z` and the
/// activation `a` of the most recent forward pass; backpropagation of a
/// sample reads them back, so it must run before the next sample is fed.
#[derive(Debug, Clone)]
pub struct Layer{
    pub size: usize,
    pub input_size: usize,
    pub(crate) weights: Matrix,   // size x input_size
    pub(crate) biases: Vec<f64>,
    weighted_input: Vec<f64>,     // z = W·x + b of the last forward pass
    activation: Vec<f64>,         // a = σ(z)
}

impl Layer {
    /// Weights and biases drawn independently from N(0, 1).
    pub fn new<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        let weights = Matrix::random_normal(size, input_size, rng);
        let biases = vector::random_normal(size, rng);

        Layer {
            size,
            input_size,
            weights,
            biases,
            weighted_input: vec![0.0; size],
            activation: vec![0.0; size],
        }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn weighted_input(&self) -> &[f64] {
        &self.weighted_input
    }

    pub fn activation(&self) -> &[f64] {
        &self.activation
    }

    /// Forward step; records `z` and `a` for backprop and returns `a`.
    pub fn feed_from(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let z = vector::add(&self.weights.multiply_vector(input)?, &self.biases)?;
        let a = sigmoid_vec(&z);
        self.weighted_input = z;
        self.activation = a.clone();
        Ok(a)
    }

    /// Error of this layer, `δ = upstream ⊙ σ'(z)`, where `upstream` is the
    /// cost gradient with respect to this layer's activation.
    pub fn error(&self, upstream: &[f64]) -> Result<Vec<f64>> {
        vector::hadamard(upstream, &sigmoid_prime_vec(&self.weighted_input))
    }

    /// Carries `δ` back through the weights: `Wᵀ·δ`, the cost gradient with
    /// respect to the previous layer's activation.
    pub fn propagate(&self, delta: &[f64]) -> Result<Vec<f64>> {
        self.weights.transpose_multiply_vector(delta)
    }

    /// Gradients for one sample. Returns (weights_grad, biases_grad), where
    /// `inputs` is the activation that fed this layer (the raw sample for the
    /// first layer).
    pub fn compute_gradients(&self, delta: &[f64], inputs: &[f64]) -> Result<(Matrix, Vec<f64>)> {
        let weights_grad = Matrix::outer(delta, &vector::transpose(inputs))?;
        Ok((weights_grad, delta.to_vec()))
    }

    /// Applies pre-computed gradients scaled by `rate`.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &[f64], rate: f64) -> Result<()> {
        self.weights = self.weights.subtract(&weights_grad.scale(rate))?;
        self.biases = vector::subtract(&self.biases, &vector::scale(biases_grad, rate))?;
        Ok(())
    }
}
