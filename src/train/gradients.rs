use crate::error::Result;
use crate::layers::dense::Layer;
use crate::math::{matrix::Matrix, vector};

/// Per-batch sums of weight and bias gradients, one pair per layer.
///
/// A batch starts from zeroed buffers; `Network::backpropagate` adds one
/// sample's gradients at a time and `Network::gradient_descent_step`
/// consumes the totals and zeroes them again.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    weights: Vec<Matrix>,
    biases: Vec<Vec<f64>>,
}

impl Gradients {
    /// Zeroed buffers shaped like the given layers' parameters.
    pub fn zeros_for(layers: &[Layer]) -> Gradients {
        Gradients {
            weights: layers.iter()
                .map(|layer| Matrix::zeros(layer.size, layer.input_size))
                .collect(),
            biases: layers.iter().map(|layer| vec![0.0; layer.size]).collect(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self, layer: usize) -> &Matrix {
        &self.weights[layer]
    }

    pub fn biases(&self, layer: usize) -> &[f64] {
        &self.biases[layer]
    }

    /// Adds one sample's gradients for `layer` to the running totals.
    pub(crate) fn accumulate(&mut self, layer: usize, weights_grad: &Matrix, biases_grad: &[f64]) -> Result<()> {
        self.weights[layer] = self.weights[layer].add(weights_grad)?;
        self.biases[layer] = vector::add(&self.biases[layer], biases_grad)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        for w in &mut self.weights {
            *w = Matrix::zeros(w.rows, w.cols);
        }
        for b in &mut self.biases {
            b.iter_mut().for_each(|x| *x = 0.0);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.weights.iter().all(Matrix::is_zero)
            && self.biases.iter().flatten().all(|&x| x == 0.0)
    }
}
