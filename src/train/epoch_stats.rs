use serde::{Serialize, Deserialize};

/// Per-epoch record emitted by `train_loop`.
///
/// One value is produced after every epoch's test pass; it is returned from
/// the loop and, when a `progress_tx` channel is configured in
/// `TrainConfig`, sent over that channel as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean quadratic cost over the training samples seen this epoch.
    pub train_cost: f64,
    /// Test samples whose predicted class matched the label.
    pub correct: usize,
    /// Size of the test set.
    pub total: usize,
    /// Wall-clock duration of this epoch (training and test pass) in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Fraction of the test set classified correctly, in `[0, 1]`.
    /// An empty test set reports 0.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}
