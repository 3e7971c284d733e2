//! Resize error definitions

use std::error::Error;
use std::fmt;

/// Reasons a table refuses a resize request
///
/// Lookups and removals never fail; a rejected resize is the only
/// condition worth reporting, and only through `try_resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// The target capacity cannot hold the entries already stored
    BelowSize {
        /// Capacity asked for
        requested: usize,
        /// Live entries at the time of the request
        len: usize,
    },
    /// The target capacity is below the smallest allowed bucket count
    BelowMinimum {
        /// Capacity asked for
        requested: usize,
    },
    /// No prime capacity at or above the request fits in a `usize`
    TooLarge {
        /// Capacity asked for
        requested: usize,
    },
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowSize { requested, len } => {
                write!(f, "capacity {requested} cannot hold {len} entries")
            }
            Self::BelowMinimum { requested } => {
                write!(f, "capacity {requested} is below the minimum of one bucket")
            }
            Self::TooLarge { requested } => {
                write!(f, "no prime capacity at or above {requested} fits in usize")
            }
        }
    }
}

impl Error for ResizeError {}

/// Result alias for resize requests
pub type ResizeResult = Result<(), ResizeError>;
