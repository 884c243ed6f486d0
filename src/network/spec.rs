use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::data::normalize::Normalization;
use crate::error::Result;
use crate::network::layout::Layout;
use crate::train::train_config::TrainConfig;

/// A fully serializable description of a training run: the layer layout,
/// the hyperparameters and how raw pixels are normalized.
///
/// Only the recipe is stored. Learned parameters are never written out, so
/// loading a spec always starts from a freshly initialized network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name shown in logs.
    pub name: String,
    /// Layer sizes, input first (e.g. `[784, 30, 10]`).
    pub layout: Layout,
    /// Epochs, batch size, learning rate and shuffling options.
    pub training: TrainConfig,
    #[serde(default)]
    pub normalization: Normalization,
}

impl NetworkSpec {
    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file and validates its
    /// hyperparameters.
    pub fn load_json(path: &Path) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.training.validate()?;
        Ok(spec)
    }
}

impl Default for NetworkSpec {
    /// 784-30-10 MNIST digit classifier: 30 epochs, batch size 10,
    /// learning rate 3.0, sigmoid pixel normalization.
    fn default() -> Self {
        NetworkSpec {
            name: "mnist".to_owned(),
            layout: Layout::mnist(),
            training: TrainConfig::default(),
            normalization: Normalization::Sigmoid,
        }
    }
}
