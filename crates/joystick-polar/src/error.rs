//! Error types for quantization.

use thiserror::Error;

/// Rejected quantization parameters.
///
/// Both bucket counts must be at least 2; a single bucket cannot
/// distinguish anything.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarError {
    /// Direction quantization needs at least two segments.
    #[error("Invalid segment count {0}: at least 2 segments are required")]
    InvalidSegmentCount(usize),

    /// Strength quantization needs at least two steps.
    #[error("Invalid step count {0}: at least 2 steps are required")]
    InvalidStepCount(usize),
}

pub type PolarResult<T> = Result<T, PolarError>;
