//! Error types for invalid construction parameters.

use std::error::Error;
use std::fmt;

/// Errors detected while validating construction parameters.
///
/// Runtime queries never produce these: lookups that miss return
/// `None`, placement conflicts return `false`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A discrete grid was requested with a zero dimension.
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A grid dimension does not fit the `i32` coordinate range.
    DimensionTooLarge {
        /// Which dimension.
        name: &'static str,
        /// The offending value.
        value: u32,
    },
    /// A discrete grid has more cells than can be allocated.
    TooManyCells {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Largest accepted `width * height`.
        max: usize,
    },
    /// A continuous extent is not finite and strictly positive.
    InvalidExtent {
        /// Which extent.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The discretization step is not finite and strictly positive, or
    /// produces a grid too large to index.
    InvalidDiscretization {
        /// The offending value.
        dx: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { width, height } => {
                write!(f, "grid must have at least one cell, got {width}x{height}")
            }
            Self::DimensionTooLarge { name, value } => {
                write!(f, "{name} {value} exceeds i32::MAX")
            }
            Self::TooManyCells { width, height, max } => {
                write!(f, "grid {width}x{height} exceeds {max} cells")
            }
            Self::InvalidExtent { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidDiscretization { dx } => {
                write!(f, "discretization step must be finite and positive, got {dx}")
            }
        }
    }
}

impl Error for ConfigError {}
