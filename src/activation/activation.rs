/// Logistic sigmoid `1 / (1 + e^-x)`.
///
/// Evaluated through `e^x / (1 + e^x)` for negative inputs so that large
/// negative `x` never computes `e^-x = inf`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the sigmoid, `sigmoid(x) * (1 - sigmoid(x))`.
pub fn sigmoid_prime(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

/// Element-wise sigmoid over a vector.
pub fn sigmoid_vec(input: &[f64]) -> Vec<f64> {
    input.iter().map(|&x| sigmoid(x)).collect()
}

/// Element-wise sigmoid derivative over a vector.
pub fn sigmoid_prime_vec(input: &[f64]) -> Vec<f64> {
    input.iter().map(|&x| sigmoid_prime(x)).collect()
}
