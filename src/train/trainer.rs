use tracing::debug;

use crate::{
    data::dataset::Dataset,
    error::{NetError, Result},
    loss::quadratic::QuadraticCost,
    network::network::Network,
};

/// Runs one epoch of mini-batch SGD over `data` in its current order and
/// returns the mean cost of the samples trained on.
///
/// The set is cut into `len / batch_size` consecutive batches; the
/// `len % batch_size` samples at the end are not used this epoch. Each
/// sample is fed forward and immediately backpropagated into the batch's
/// gradient buffers, then one descent step applies the batch.
pub fn train_epoch(
    network: &mut Network,
    data: &Dataset,
    batch_size: usize,
    learning_rate: f64,
) -> Result<f64> {
    if batch_size == 0 {
        return Err(NetError::Configuration("batch size must be at least 1".to_owned()));
    }

    let mut total_cost = 0.0;
    let mut seen = 0usize;

    let batches = data.images().chunks_exact(batch_size)
        .zip(data.labels().chunks_exact(batch_size));

    for (images, labels) in batches {
        // Fresh zeroed buffers for every batch.
        let mut gradients = network.gradients();

        for (image, &label) in images.iter().zip(labels) {
            let output = network.forward(image)?;
            total_cost += QuadraticCost::loss(&output, label)?;
            network.backpropagate(&output, image, label, &mut gradients)?;
            seen += 1;
        }

        network.gradient_descent_step(&mut gradients, learning_rate, batch_size)?;
    }

    debug!(
        "trained on {} samples in {} batches, {} skipped",
        seen,
        seen / batch_size,
        data.len() - seen
    );

    Ok(if seen == 0 { 0.0 } else { total_cost / seen as f64 })
}
