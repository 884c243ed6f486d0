use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — full passes over the training data; `0` trains nothing
/// - `batch_size`    — samples per mini-batch; samples left over after the
///                     last full batch are skipped for that epoch
/// - `learning_rate` — SGD step size, divided by `batch_size` per update
/// - `shuffle_test`  — also reshuffle the test set after every epoch
/// - `seed`          — seeds the RNG used for shuffling; `None` uses
///                     `thread_rng`
/// - `progress_tx`   — optional channel sender; one `EpochStats` is sent per
///                     completed epoch. A dropped receiver is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    #[serde(default = "default_shuffle_test")]
    pub shuffle_test: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

fn default_shuffle_test() -> bool {
    true
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no seed and no progress channel.
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            shuffle_test: true,
            seed: None,
            progress_tx: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetError::Configuration("batch size must be at least 1".to_owned()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NetError::Configuration(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    /// 30 epochs of batch size 10 at learning rate 3.0.
    fn default() -> Self {
        TrainConfig::new(30, 10, 3.0)
    }
}
