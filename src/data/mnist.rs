use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::data::{dataset::Dataset, idx::parse_idx_pair, normalize::Normalization};
use crate::error::{NetError, Result};

pub const TRAIN_IMAGES: &str = "train-images.idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels.idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images.idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels.idx1-ubyte";

/// Loads the training and test splits from a directory holding the four
/// standard MNIST files. Returns `(train, test)`.
pub fn load_mnist(dir: &Path, normalization: Normalization) -> Result<(Dataset, Dataset)> {
    let train = load_split(dir, TRAIN_IMAGES, TRAIN_LABELS, normalization)?;
    let test = load_split(dir, TEST_IMAGES, TEST_LABELS, normalization)?;
    info!(
        "loaded {} training and {} test samples from {}",
        train.len(),
        test.len(),
        dir.display()
    );
    Ok((train, test))
}

fn load_split(dir: &Path, images: &str, labels: &str, normalization: Normalization) -> Result<Dataset> {
    let image_bytes = fs::read(resolve(dir, images)?)?;
    let label_bytes = fs::read(resolve(dir, labels)?)?;
    parse_idx_pair(&image_bytes, &label_bytes, normalization)
}

/// Finds `name` in `dir`, also accepting the common hyphenated spelling
/// (`train-images-idx3-ubyte`).
fn resolve(dir: &Path, name: &str) -> Result<PathBuf> {
    let dotted = dir.join(name);
    if dotted.is_file() {
        return Ok(dotted);
    }
    let hyphenated = dir.join(name.replace('.', "-"));
    if hyphenated.is_file() {
        debug!("using {}", hyphenated.display());
        return Ok(hyphenated);
    }
    Err(NetError::Data(format!(
        "neither {} nor {} exists",
        dotted.display(),
        hyphenated.display()
    )))
}
