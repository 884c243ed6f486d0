use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::activation::sigmoid;

/// How raw `u8` pixels become network inputs.
///
/// - `Sigmoid` — zero stays 0.0, any other byte `b` becomes `sigmoid(b)`.
///   This squashes every lit pixel to roughly 0.73..1.0.
/// - `Scale`   — `b / 255`, a linear map onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    #[default]
    Sigmoid,
    Scale,
}

impl Normalization {
    pub fn apply(&self, pixel: u8) -> f64 {
        match self {
            Normalization::Sigmoid => {
                if pixel == 0 { 0.0 } else { sigmoid(pixel as f64) }
            }
            Normalization::Scale => pixel as f64 / 255.0,
        }
    }

    pub fn apply_all(&self, pixels: &[u8]) -> Vec<f64> {
        pixels.iter().map(|&p| self.apply(p)).collect()
    }
}

impl FromStr for Normalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(Normalization::Sigmoid),
            "scale" => Ok(Normalization::Scale),
            other => Err(format!("unknown normalization '{}', expected sigmoid or scale", other)),
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::Sigmoid => write!(f, "sigmoid"),
            Normalization::Scale => write!(f, "scale"),
        }
    }
}
