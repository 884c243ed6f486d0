//! Vector primitives over plain `f64` slices.
//!
//! Like the matrix kernel these never mutate their inputs and fail with a
//! dimension error instead of broadcasting.

use rand::Rng;

use crate::error::{NetError, Result};
use crate::math::matrix::{Matrix, Shape};

pub fn dot(u: &[f64], v: &[f64]) -> Result<f64> {
    check_len("dot", u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a * b).sum())
}

pub fn add(u: &[f64], v: &[f64]) -> Result<Vec<f64>> {
    check_len("add", u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a + b).collect())
}

pub fn subtract(u: &[f64], v: &[f64]) -> Result<Vec<f64>> {
    check_len("subtract", u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a - b).collect())
}

/// Element-wise (Hadamard) product.
pub fn hadamard(u: &[f64], v: &[f64]) -> Result<Vec<f64>> {
    check_len("hadamard", u, v)?;
    Ok(u.iter().zip(v).map(|(a, b)| a * b).collect())
}

pub fn scale(v: &[f64], factor: f64) -> Vec<f64> {
    v.iter().map(|x| x * factor).collect()
}

/// Views `v` as an `n x 1` column matrix.
pub fn transpose(v: &[f64]) -> Matrix {
    Matrix {
        rows: v.len(),
        cols: 1,
        data: v.iter().map(|&x| vec![x]).collect(),
    }
}

pub fn random_normal<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f64> {
    (0..len).map(|_| Matrix::sample_standard_normal(rng)).collect()
}

/// Vector of length `len` with 1.0 at `index` and 0.0 elsewhere.
pub fn one_hot(index: usize, len: usize) -> Vec<f64> {
    let mut res = vec![0.0; len];
    if let Some(slot) = res.get_mut(index) {
        *slot = 1.0;
    }
    res
}

/// Index of the maximum element; ties resolve to the lowest index.
/// Returns 0 for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate() {
        if x > v[best] {
            best = i;
        }
    }
    best
}

fn check_len(op: &'static str, u: &[f64], v: &[f64]) -> Result<()> {
    if u.len() != v.len() {
        return Err(NetError::dimension(op, Shape::vector(u.len()), Shape::vector(v.len())));
    }
    Ok(())
}
