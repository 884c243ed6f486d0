use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Ordered layer sizes `[n0, n1, ..., nL]`: `n0` is the input width and `nL`
/// the number of output classes. At least two entries, all positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Layout(Vec<usize>);

impl Layout {
    pub fn new(sizes: Vec<usize>) -> Result<Layout> {
        if sizes.len() < 2 {
            return Err(NetError::Configuration(format!(
                "layout needs an input and an output size, got {} entries",
                sizes.len()
            )));
        }
        if let Some(pos) = sizes.iter().position(|&n| n == 0) {
            return Err(NetError::Configuration(format!(
                "layout entry {} is zero; every layer needs at least one neuron",
                pos
            )));
        }
        Ok(Layout(sizes))
    }

    /// 784 inputs (28x28 pixels), 30 hidden neurons, 10 digit classes.
    pub fn mnist() -> Layout {
        Layout(vec![784, 30, 10])
    }

    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Number of weighted layers, L.
    pub fn layer_count(&self) -> usize {
        self.0.len() - 1
    }

    /// `(size, input_size)` for each weighted layer, input side first.
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|pair| (pair[1], pair[0]))
    }
}

impl TryFrom<Vec<usize>> for Layout {
    type Error = NetError;

    fn try_from(sizes: Vec<usize>) -> Result<Layout> {
        Layout::new(sizes)
    }
}

impl From<Layout> for Vec<usize> {
    fn from(layout: Layout) -> Vec<usize> {
        layout.0
    }
}

impl FromStr for Layout {
    type Err = NetError;

    /// Parses a comma-separated list such as `784,30,10`.
    fn from_str(s: &str) -> Result<Layout> {
        let sizes = s
            .split(',')
            .map(|part| {
                part.trim().parse::<usize>().map_err(|e| {
                    NetError::Configuration(format!("bad layout entry '{}': {}", part.trim(), e))
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Layout::new(sizes)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
