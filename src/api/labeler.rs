use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::core::{AxisOrientation, format_number};
use crate::error::ChartError;

/// Failure reported by a host-supplied label formatter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LabelFormatError(pub String);

pub type LabelFormatterFn =
    Arc<dyn Fn(f64) -> Result<String, LabelFormatError> + Send + Sync + 'static>;

/// Turns separator values into label text.
#[derive(Clone, Default)]
pub enum Labeler {
    /// `format_number` output.
    #[default]
    Default,
    /// Fixed text per separator index, used with custom separators.
    List(Arc<[String]>),
    Custom(LabelFormatterFn),
}

impl fmt::Debug for Labeler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Labeler::Default"),
            Self::List(labels) => f.debug_tuple("Labeler::List").field(&labels.len()).finish(),
            Self::Custom(_) => f.write_str("Labeler::Custom(..)"),
        }
    }
}

impl Labeler {
    pub fn custom<F>(formatter: F) -> Self
    where
        F: Fn(f64) -> Result<String, LabelFormatError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(formatter))
    }

    #[must_use]
    pub fn list<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(labels.into_iter().map(Into::into).collect())
    }

    pub fn format(&self, value: f64) -> Result<String, LabelFormatError> {
        match self {
            Self::Default => Ok(format_number(value)),
            Self::List(labels) => {
                let rounded = value.round();
                if rounded < 0.0 || (value - rounded).abs() > 1e-9 {
                    return Err(LabelFormatError(format!(
                        "no list label for non-index value {value}"
                    )));
                }
                labels
                    .get(rounded as usize)
                    .cloned()
                    .ok_or_else(|| LabelFormatError(format!("no list label at index {rounded}")))
            }
            Self::Custom(formatter) => formatter(value),
        }
    }

    /// Formats `value`, logging failures and falling back to an empty label
    /// so one bad value never aborts a layout pass.
    #[must_use]
    pub fn format_or_log(&self, orientation: AxisOrientation, value: f64) -> String {
        match self.format(value) {
            Ok(text) => text,
            Err(err) => {
                let err = ChartError::LabelFormat {
                    orientation,
                    value,
                    message: err.0,
                };
                warn!(error = %err, "falling back to an empty separator label");
                String::new()
            }
        }
    }
}
