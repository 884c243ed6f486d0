pub mod activation;

pub use activation::{sigmoid, sigmoid_prime, sigmoid_prime_vec, sigmoid_vec};
