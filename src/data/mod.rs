pub mod dataset;
pub mod idx;
pub mod mnist;
pub mod normalize;

pub use dataset::Dataset;
pub use mnist::load_mnist;
pub use normalize::Normalization;
