use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, warn};

use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_epoch;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns one `EpochStats`
/// per epoch.
///
/// Each epoch trains on `train` in its current order (see
/// [`train_epoch`]), counts correct predictions on `test`, reports the
/// result, then reshuffles `train` (and `test`, when `config.shuffle_test`
/// is set). Shuffling draws from `StdRng::seed_from_u64(seed)` when
/// `config.seed` is set and from `thread_rng` otherwise.
///
/// # Errors
/// Fails before the first epoch on an invalid config, a sample whose width
/// differs from the input layer, or a label outside the output range, for
/// either split.
pub fn train_loop(
    network: &mut Network,
    train: &mut Dataset,
    test: &mut Dataset,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    match config.seed {
        Some(seed) => train_loop_with_rng(network, train, test, config, &mut StdRng::seed_from_u64(seed)),
        None => train_loop_with_rng(network, train, test, config, &mut rand::thread_rng()),
    }
}

/// [`train_loop`] with an explicit shuffling RNG; `config.seed` is ignored.
pub fn train_loop_with_rng<R: Rng + ?Sized>(
    network: &mut Network,
    train: &mut Dataset,
    test: &mut Dataset,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    let layout = network.layout();
    train.validate(layout.input_size(), layout.output_size())?;
    test.validate(layout.input_size(), layout.output_size())?;

    warn_about_unused_samples(train.len(), config);

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        let t_start = Instant::now();

        // ── One pass over the training data ───────────────────────────────
        let train_cost = train_epoch(network, train, config.batch_size, config.learning_rate)?;

        // ── Test pass ────────────────────────────────────────────────────
        let correct = network.evaluate(test.images(), test.labels())?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_cost,
            correct,
            total: test.len(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        info!(
            "Epoch: {} Correct Images: {}/{} ({:.2}%), train cost {:.6}",
            epoch,
            correct,
            stats.total,
            stats.accuracy() * 100.0,
            train_cost
        );

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(ref tx) = config.progress_tx {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(stats.clone());
        }
        history.push(stats);

        train.shuffle(rng);
        if config.shuffle_test {
            test.shuffle(rng);
        }
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn warn_about_unused_samples(samples: usize, config: &TrainConfig) {
    if config.epochs == 0 {
        return;
    }
    if config.batch_size > samples {
        warn!(
            "batch size {} exceeds the {} training samples; parameters will not change",
            config.batch_size, samples
        );
    } else if samples % config.batch_size != 0 {
        warn!(
            "{} of {} training samples do not fill a batch of {} and are skipped every epoch",
            samples % config.batch_size,
            samples,
            config.batch_size
        );
    }
}
