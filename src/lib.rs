pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;
pub mod data;
pub mod error;

// Convenience re-exports
pub use math::matrix::{Matrix, Shape};
pub use layers::dense::Layer;
pub use network::{layout::Layout, network::Network, spec::NetworkSpec};
pub use loss::quadratic::QuadraticCost;
pub use optim::sgd::Sgd;
pub use train::{EpochStats, Gradients, TrainConfig, train_loop};
pub use data::{dataset::Dataset, normalize::Normalization};
pub use error::{NetError, Result};
