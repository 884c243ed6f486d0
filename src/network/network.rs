use std::fmt;

use rand::Rng;

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::loss::quadratic::QuadraticCost;
use crate::math::{matrix::Shape, vector};
use crate::network::layout::Layout;
use crate::optim::sgd::Sgd;
use crate::train::{epoch_stats::EpochStats, gradients::Gradients, loop_fn, train_config::TrainConfig};

/// Fully-connected sigmoid classifier.
///
/// Layers are stored input side first; layer `l` holds `W_l` of shape
/// `(n_l, n_{l-1})` and `b_l` of length `n_l`. Parameters only change in
/// `gradient_descent_step`.
#[derive(Debug, Clone)]
pub struct Network {
    layout: Layout,
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network with N(0, 1) weights and biases from `thread_rng`.
    pub fn new(layout: Layout) -> Network {
        Network::with_rng(layout, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(layout: Layout, rng: &mut R) -> Network {
        let layers = layout.layer_shapes()
            .map(|(size, input_size)| Layer::new(size, input_size, rng))
            .collect();
        Network { layout, layers }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Zeroed gradient buffers shaped like this network's parameters.
    pub fn gradients(&self) -> Gradients {
        Gradients::zeros_for(&self.layers)
    }

    /// Forward pass; stores `z` and `a` in each layer for backprop.
    ///
    /// Deterministic: the same sample under unchanged parameters always
    /// yields the same output.
    pub fn forward(&mut self, sample: &[f64]) -> Result<Vec<f64>> {
        let mut current = self.layers[0].feed_from(sample)?;
        for layer in &mut self.layers[1..] {
            current = layer.feed_from(&current)?;
        }
        Ok(current)
    }

    /// Adds one sample's gradients to `gradients`.
    ///
    /// `output` must be the result of `forward(sample)` with nothing fed in
    /// between, since the layers' stored `z` and `a` are read back here.
    pub fn backpropagate(
        &self,
        output: &[f64],
        sample: &[f64],
        label: usize,
        gradients: &mut Gradients,
    ) -> Result<()> {
        let classes = self.layout.output_size();
        if label >= classes {
            return Err(NetError::InvalidLabel { label, classes, index: None });
        }
        self.check_gradients(gradients)?;

        // ∂C/∂a_L for the quadratic cost, i.e. output - one_hot(label)
        let mut upstream = QuadraticCost::derivative(output, label)?;

        for l in (0..self.layers.len()).rev() {
            let layer = &self.layers[l];
            let delta = layer.error(&upstream)?;
            let inputs = if l == 0 { sample } else { self.layers[l - 1].activation() };

            let (weights_grad, biases_grad) = layer.compute_gradients(&delta, inputs)?;
            gradients.accumulate(l, &weights_grad, &biases_grad)?;

            if l > 0 {
                upstream = layer.propagate(&delta)?;
            }
        }

        Ok(())
    }

    /// `W_l <- W_l - (learning_rate / batch_size) * ΣdW_l` (same for biases)
    /// on every layer, then zeroes `gradients`.
    pub fn gradient_descent_step(
        &mut self,
        gradients: &mut Gradients,
        learning_rate: f64,
        batch_size: usize,
    ) -> Result<()> {
        if batch_size == 0 {
            return Err(NetError::Configuration("batch size must be at least 1".to_owned()));
        }
        self.check_gradients(gradients)?;

        let optimizer = Sgd::new(learning_rate);
        for (l, layer) in self.layers.iter_mut().enumerate() {
            optimizer.step(layer, gradients.weights(l), gradients.biases(l), batch_size)?;
        }
        gradients.reset();
        Ok(())
    }

    /// Number of samples whose predicted class equals the label.
    /// Leaves gradient buffers alone; only the per-layer forward state changes.
    pub fn evaluate(&mut self, images: &[Vec<f64>], labels: &[usize]) -> Result<usize> {
        if images.len() != labels.len() {
            return Err(NetError::Data(format!(
                "{} images but {} labels",
                images.len(),
                labels.len()
            )));
        }

        let mut correct = 0;
        for (image, &label) in images.iter().zip(labels) {
            let output = self.forward(image)?;
            if Network::is_correct(&output, label) {
                correct += 1;
            }
        }
        Ok(correct)
    }

    /// Predicted class: index of the largest output, lowest index on ties.
    pub fn predict(&mut self, sample: &[f64]) -> Result<usize> {
        Ok(vector::argmax(&self.forward(sample)?))
    }

    pub fn is_correct(output: &[f64], label: usize) -> bool {
        !output.is_empty() && vector::argmax(output) == label
    }

    /// Runs `config.epochs` epochs of mini-batch SGD on `train`, evaluating
    /// on `test` after each one. Both sets are reshuffled between epochs.
    /// See [`loop_fn::train_loop`].
    pub fn train(&mut self, train: &mut Dataset, test: &mut Dataset, config: &TrainConfig) -> Result<Vec<EpochStats>> {
        loop_fn::train_loop(self, train, test, config)
    }

    fn check_gradients(&self, gradients: &Gradients) -> Result<()> {
        if gradients.layer_count() != self.layers.len() {
            return Err(NetError::Configuration(format!(
                "gradient buffers cover {} layers, network has {}",
                gradients.layer_count(),
                self.layers.len()
            )));
        }
        for (l, layer) in self.layers.iter().enumerate() {
            let expected = Shape::new(layer.size, layer.input_size);
            let weights = gradients.weights(l).shape();
            if weights != expected {
                return Err(NetError::dimension("gradients", expected, weights));
            }
            let biases = gradients.biases(l).len();
            if biases != layer.size {
                return Err(NetError::dimension("gradients", Shape::vector(layer.size), Shape::vector(biases)));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Network {
    /// One block per layer:
    /// ```text
    /// Layer: 0, Number of Neurons: 3, Number of Weights per neuron: 2
    /// Weights:
    /// Neuron 0: [w, w]
    /// ...
    /// Bias: [b, b, b]
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "Layer: {}, Number of Neurons: {}, Number of Weights per neuron: {}",
                i, layer.size, layer.input_size
            )?;
            writeln!(f, "Weights:")?;
            for (n, row) in layer.weights().data.iter().enumerate() {
                writeln!(f, "Neuron {}: {:?}", n, row)?;
            }
            writeln!(f, "Bias: {:?}", layer.biases())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn network(sizes: &[usize], seed: u64) -> Network {
        let layout = Layout::new(sizes.to_vec()).unwrap();
        Network::with_rng(layout, &mut StdRng::seed_from_u64(seed))
    }

    fn cost(net: &mut Network, sample: &[f64], label: usize) -> f64 {
        let output = net.forward(sample).unwrap();
        QuadraticCost::loss(&output, label).unwrap()
    }

    #[test]
    fn parameters_follow_the_layout() {
        let net = network(&[4, 3, 2], 1);
        assert_eq!(net.layers().len(), 2);
        assert_eq!((net.layers()[0].weights().rows, net.layers()[0].weights().cols), (3, 4));
        assert_eq!((net.layers()[1].weights().rows, net.layers()[1].weights().cols), (2, 3));
        assert_eq!(net.layers()[1].biases().len(), 2);
    }

    #[test]
    fn forward_is_deterministic() {
        let mut net = network(&[3, 5, 4, 2], 9);
        let sample = [0.3, -1.2, 0.8];
        let first = net.forward(&sample).unwrap();
        let second = net.forward(&sample).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn forward_rejects_wrong_sample_width() {
        let mut net = network(&[3, 2], 1);
        assert!(matches!(net.forward(&[1.0, 2.0]), Err(NetError::Dimension { .. })));
    }

    #[test]
    fn single_layer_network_uses_the_sample_as_input() {
        let mut net = network(&[2, 2], 4);
        let sample = [0.5, -0.25];
        let output = net.forward(&sample).unwrap();
        let mut grads = net.gradients();
        net.backpropagate(&output, &sample, 1, &mut grads).unwrap();

        let delta = net.layers()[0].error(&QuadraticCost::derivative(&output, 1).unwrap()).unwrap();
        let expected = Matrix::outer(&delta, &vector::transpose(&sample)).unwrap();
        assert_eq!(grads.weights(0), &expected);
        assert_eq!(grads.biases(0), delta.as_slice());
    }

    #[test]
    fn backpropagate_matches_finite_differences() {
        let mut net = network(&[2, 3, 2], 21);
        let sample = [0.7, -0.4];
        let label = 1;
        let eps = 1e-6;

        let output = net.forward(&sample).unwrap();
        let mut grads = net.gradients();
        net.backpropagate(&output, &sample, label, &mut grads).unwrap();

        for l in 0..net.layers.len() {
            let (rows, cols) = (net.layers[l].size, net.layers[l].input_size);
            for i in 0..rows {
                for j in 0..cols {
                    let original = net.layers[l].weights.data[i][j];
                    net.layers[l].weights.data[i][j] = original + eps;
                    let plus = cost(&mut net, &sample, label);
                    net.layers[l].weights.data[i][j] = original - eps;
                    let minus = cost(&mut net, &sample, label);
                    net.layers[l].weights.data[i][j] = original;

                    let numeric = (plus - minus) / (2.0 * eps);
                    assert_relative_eq!(grads.weights(l).data[i][j], numeric, epsilon = 1e-6);
                }

                let original = net.layers[l].biases[i];
                net.layers[l].biases[i] = original + eps;
                let plus = cost(&mut net, &sample, label);
                net.layers[l].biases[i] = original - eps;
                let minus = cost(&mut net, &sample, label);
                net.layers[l].biases[i] = original;

                let numeric = (plus - minus) / (2.0 * eps);
                assert_relative_eq!(grads.biases(l)[i], numeric, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn backpropagate_sums_over_samples() {
        let mut net = network(&[2, 3, 2], 5);
        let samples = [([0.1, 0.9], 0), ([0.8, 0.2], 1)];

        let mut together = net.gradients();
        let mut separate = Vec::new();
        for (sample, label) in &samples {
            let output = net.forward(sample).unwrap();
            net.backpropagate(&output, sample, *label, &mut together).unwrap();
            let mut single = net.gradients();
            net.backpropagate(&output, sample, *label, &mut single).unwrap();
            separate.push(single);
        }

        for l in 0..2 {
            let sum = separate[0].weights(l).add(separate[1].weights(l)).unwrap();
            for (a, b) in together.weights(l).data.iter().flatten().zip(sum.data.iter().flatten()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn backpropagate_rejects_out_of_range_label() {
        let mut net = network(&[2, 3, 2], 5);
        let output = net.forward(&[0.0, 1.0]).unwrap();
        let mut grads = net.gradients();
        assert!(matches!(
            net.backpropagate(&output, &[0.0, 1.0], 2, &mut grads),
            Err(NetError::InvalidLabel { label: 2, classes: 2, .. })
        ));
        assert!(grads.is_zero());
    }

    #[test]
    fn descent_step_moves_parameters_and_resets_accumulators() {
        let mut net = network(&[2, 3, 2], 8);
        let before = net.clone();
        let sample = [0.2, 0.6];
        let mut grads = net.gradients();
        for _ in 0..3 {
            let output = net.forward(&sample).unwrap();
            net.backpropagate(&output, &sample, 0, &mut grads).unwrap();
        }
        let expected_w = before.layers[1].weights.subtract(&grads.weights(1).scale(0.5 / 3.0)).unwrap();
        let expected_b = vector::subtract(before.layers[1].biases(), &vector::scale(grads.biases(1), 0.5 / 3.0)).unwrap();

        net.gradient_descent_step(&mut grads, 0.5, 3).unwrap();

        assert!(grads.is_zero());
        assert_eq!(net.layers[1].weights(), &expected_w);
        assert_eq!(net.layers[1].biases(), expected_b.as_slice());
    }

    #[test]
    fn descent_step_rejects_zero_batch_without_touching_parameters() {
        let mut net = network(&[2, 2], 8);
        let before = net.layers[0].weights().clone();
        let mut grads = net.gradients();
        assert!(matches!(
            net.gradient_descent_step(&mut grads, 1.0, 0),
            Err(NetError::Configuration(_))
        ));
        assert_eq!(net.layers[0].weights(), &before);
    }

    #[test]
    fn foreign_gradient_buffers_are_rejected() {
        let net = network(&[2, 3, 2], 1);
        let other = network(&[2, 2], 1);
        let mut grads = other.gradients();
        assert!(net.backpropagate(&[0.5, 0.5], &[0.0, 0.0], 0, &mut grads).is_err());
    }

    #[test]
    fn misshapen_gradient_buffers_leave_state_untouched() {
        let mut net = network(&[2, 3, 2], 1);
        let mut wider = network(&[2, 3, 4], 1);
        let mut grads = wider.gradients();
        let sample = [0.3, 0.9];
        let output = wider.forward(&sample).unwrap();
        wider.backpropagate(&output, &sample, 3, &mut grads).unwrap();
        let before_net = net.clone();
        let before_grads = grads.clone();

        let step = net.gradient_descent_step(&mut grads, 1.0, 1);
        assert!(matches!(step, Err(NetError::Dimension { op: "gradients", .. })));
        assert_eq!(net.layers()[0].weights(), before_net.layers()[0].weights());
        assert_eq!(net.layers()[1].biases(), before_net.layers()[1].biases());
        assert_eq!(grads, before_grads);

        let output = net.forward(&sample).unwrap();
        let back = net.backpropagate(&output, &sample, 1, &mut grads);
        assert!(matches!(back, Err(NetError::Dimension { .. })));
        assert_eq!(grads, before_grads);
    }

    #[test]
    fn is_correct_uses_lowest_index_argmax() {
        assert!(Network::is_correct(&[0.2, 0.7, 0.1], 1));
        assert!(!Network::is_correct(&[0.2, 0.7, 0.1], 0));
        assert!(Network::is_correct(&[0.4, 0.4, 0.1], 0));
        assert!(!Network::is_correct(&[0.4, 0.4, 0.1], 1));
    }

    #[test]
    fn evaluate_counts_matches_without_touching_gradients() {
        let mut net = network(&[2, 3, 2], 3);
        let images = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.5, 0.5]];
        let predictions: Vec<usize> = images.iter().map(|i| net.predict(i).unwrap()).collect();

        assert_eq!(net.evaluate(&images, &predictions).unwrap(), 3);
        let flipped: Vec<usize> = predictions.iter().map(|p| 1 - p).collect();
        assert_eq!(net.evaluate(&images, &flipped).unwrap(), 0);
        assert!(net.evaluate(&images, &[0]).is_err());
    }

    #[test]
    fn display_lists_every_layer() {
        let net = network(&[2, 3, 1], 2);
        let text = net.to_string();
        assert!(text.contains("Layer: 0, Number of Neurons: 3, Number of Weights per neuron: 2"));
        assert!(text.contains("Layer: 1, Number of Neurons: 1, Number of Weights per neuron: 3"));
        assert_eq!(text.matches("Neuron ").count(), 4);
        assert_eq!(text.matches("Bias: ").count(), 2);
    }
}
