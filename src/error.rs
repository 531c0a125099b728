use thiserror::Error;

use crate::core::AxisOrientation;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Malformed bounds handed to step, scale or diagonal generation.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A single measure pass enumerated more separators than any sane
    /// configuration produces; usually a zero or negative step.
    #[error("too many separators ({count}) on {orientation:?} axis; check the axis step configuration")]
    ExcessiveSeparators {
        orientation: AxisOrientation,
        count: usize,
    },

    #[error("label formatter failed for {orientation:?} axis at value {value}: {message}")]
    LabelFormat {
        orientation: AxisOrientation,
        value: f64,
        message: String,
    },

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
