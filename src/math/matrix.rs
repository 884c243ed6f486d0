use rand::Rng;
use std::f64::consts::PI;
use std::fmt;

use crate::error::{NetError, Result};

/// Row/column extent of an operand, carried by dimension errors.
/// Vectors are reported as single columns (`n x 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Shape {
        Shape { rows, cols }
    }

    pub fn vector(len: usize) -> Shape {
        Shape { rows: len, cols: 1 }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Dense row-major matrix. Every operation leaves its operands untouched and
/// returns a freshly allocated result.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    pub(crate) fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Every entry drawn independently from the standard normal N(0, 1).
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng);
            }
        }
        res
    }

    /// Builds a matrix from row vectors. Rows must all have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NetError::dimension(
                "from_data",
                Shape::new(rows, cols),
                Shape::vector(bad.len()),
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Standard matrix product `(m x n) * (n x p) -> (m x p)`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NetError::dimension("multiply", self.shape(), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Matrix-vector product `(m x n) * n -> m`.
    pub fn multiply_vector(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if self.cols != vector.len() {
            return Err(NetError::dimension(
                "multiply_vector",
                self.shape(),
                Shape::vector(vector.len()),
            ));
        }

        Ok(self.data.iter()
            .map(|row| row.iter().zip(vector).map(|(w, x)| w * x).sum())
            .collect())
    }

    /// `transpose(self) * vector` without building the transpose:
    /// `(m x n)^T * m -> n`.
    pub fn transpose_multiply_vector(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if self.rows != vector.len() {
            return Err(NetError::dimension(
                "transpose_multiply_vector",
                self.shape(),
                Shape::vector(vector.len()),
            ));
        }

        let mut res = vec![0.0; self.cols];
        for (row, &x) in self.data.iter().zip(vector) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += w * x;
            }
        }
        Ok(res)
    }

    /// Product of a length-`n` vector with an `m x 1` column matrix, giving
    /// the `n x m` matrix `res[i][j] = vector[i] * column[j][0]`.
    ///
    /// Backpropagation builds each weight gradient this way from a layer's
    /// error and the transposed activation feeding it.
    pub fn outer(vector: &[f64], column: &Matrix) -> Result<Matrix> {
        if column.cols != 1 {
            return Err(NetError::dimension(
                "outer",
                Shape::vector(vector.len()),
                column.shape(),
            ));
        }

        let mut res = Matrix::zeros(vector.len(), column.rows);
        for (i, &v) in vector.iter().enumerate() {
            for j in 0..column.rows {
                res.data[i][j] = column.data[j][0] * v;
            }
        }

        Ok(res)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().flatten().all(|&x| x == 0.0)
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(NetError::dimension(op, self.shape(), rhs.shape()));
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&x, &y)| functor(x, y)).collect()
            })
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
