use crate::error::{NetError, Result};
use crate::math::vector;

/// Quadratic cost against a one-hot target: `0.5 * sum((a - y)^2)`.
///
/// The one-half factor makes the per-output gradient exactly `a - y`, which
/// is the output error the network backpropagates.
pub struct QuadraticCost;

impl QuadraticCost {
    /// Scalar cost of `predicted` for class `label`.
    pub fn loss(predicted: &[f64], label: usize) -> Result<f64> {
        let target = Self::target(predicted.len(), label)?;
        Ok(0.5 * predicted.iter().zip(target.iter())
            .map(|(a, y)| (a - y).powi(2))
            .sum::<f64>())
    }

    /// Per-output gradient: `predicted - one_hot(label)`.
    pub fn derivative(predicted: &[f64], label: usize) -> Result<Vec<f64>> {
        let target = Self::target(predicted.len(), label)?;
        vector::subtract(predicted, &target)
    }

    fn target(classes: usize, label: usize) -> Result<Vec<f64>> {
        if label >= classes {
            return Err(NetError::InvalidLabel { label, classes, index: None });
        }
        Ok(vector::one_hot(label, classes))
    }
}
