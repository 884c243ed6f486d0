//! Command-line front end: trains a sigmoid classifier on MNIST-style IDX
//! files and logs the test accuracy after every epoch.
//!
//! ```text
//! backprop-nn train --data-dir MNistData
//! backprop-nn train --spec run.json --epochs 5 --seed 7
//! backprop-nn init-spec run.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use backprop_nn::{data::load_mnist, Layout, Network, NetworkSpec, Normalization};

#[derive(Parser)]
#[command(name = "backprop-nn")]
#[command(about = "Train a from-scratch sigmoid network on IDX image data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network and report test accuracy per epoch
    Train {
        /// Directory holding the four IDX files
        #[arg(short, long, default_value = "MNistData")]
        data_dir: PathBuf,

        /// JSON run spec; the flags below override its values
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Layer sizes, e.g. 784,30,10
        #[arg(long)]
        layout: Option<Layout>,

        /// Samples per mini-batch
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// SGD learning rate
        #[arg(short = 'r', long)]
        learning_rate: Option<f64>,

        /// Number of epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Seed for shuffling (initialization is seeded too)
        #[arg(long)]
        seed: Option<u64>,

        /// Pixel normalization: sigmoid or scale
        #[arg(short, long)]
        normalization: Option<Normalization>,

        /// Keep the test set in file order between epochs
        #[arg(long)]
        no_shuffle_test: bool,

        /// Print every weight and bias after training
        #[arg(long)]
        dump: bool,
    },

    /// Write the default run spec to a JSON file
    InitSpec {
        /// Output path
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            data_dir,
            spec,
            layout,
            batch_size,
            learning_rate,
            epochs,
            seed,
            normalization,
            no_shuffle_test,
            dump,
        } => {
            let mut spec = match spec {
                Some(path) => NetworkSpec::load_json(&path)
                    .with_context(|| format!("failed to load spec {}", path.display()))?,
                None => NetworkSpec::default(),
            };
            if let Some(layout) = layout {
                spec.layout = layout;
            }
            if let Some(batch_size) = batch_size {
                spec.training.batch_size = batch_size;
            }
            if let Some(learning_rate) = learning_rate {
                spec.training.learning_rate = learning_rate;
            }
            if let Some(epochs) = epochs {
                spec.training.epochs = epochs;
            }
            if let Some(seed) = seed {
                spec.training.seed = Some(seed);
            }
            if let Some(normalization) = normalization {
                spec.normalization = normalization;
            }
            if no_shuffle_test {
                spec.training.shuffle_test = false;
            }
            spec.training.validate()?;

            train(&data_dir, &spec, dump)?;
        }

        Commands::InitSpec { output } => {
            NetworkSpec::default()
                .save_json(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("Wrote default spec to {}", output.display());
        }
    }

    Ok(())
}

fn train(data_dir: &Path, spec: &NetworkSpec, dump: bool) -> Result<()> {
    let (mut train_set, mut test_set) = load_mnist(data_dir, spec.normalization)
        .with_context(|| format!("failed to load IDX data from {}", data_dir.display()))?;

    let mut network = match spec.training.seed {
        Some(seed) => {
            // offset so initialization and shuffling use different streams
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
            Network::with_rng(spec.layout.clone(), &mut rng)
        }
        None => Network::new(spec.layout.clone()),
    };

    info!(
        "Training '{}': layout {}, batch size {}, learning rate {}, {} epochs, {} normalization",
        spec.name,
        spec.layout,
        spec.training.batch_size,
        spec.training.learning_rate,
        spec.training.epochs,
        spec.normalization
    );

    let history = network.train(&mut train_set, &mut test_set, &spec.training)?;

    if let Some(best) = history.iter().max_by_key(|s| s.correct) {
        info!(
            "Best epoch {}: {}/{} ({:.2}%)",
            best.epoch,
            best.correct,
            best.total,
            best.accuracy() * 100.0
        );
    }

    if dump {
        println!("{}", network);
    }

    Ok(())
}
