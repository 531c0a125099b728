use serde::{Deserialize, Serialize};

/// Smallest value an axis bound is allowed to reach before it is used as a
/// divisor or fed to a logarithm.
pub const MIN_POSITIVE_BOUND: f64 = 1e-12;

/// Data-space extent an axis must cover during one layout pass.
///
/// Starts empty and grows as values are appended. `min_delta` tracks the
/// smallest positive gap seen between appended values and seeds the default
/// minimum zoom span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
    pub min_delta: f64,
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl AxisBounds {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            min_delta: f64::INFINITY,
        }
    }

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            min_delta: f64::INFINITY,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.min.is_finite() || !self.max.is_finite() || self.min > self.max
    }

    #[must_use]
    pub fn span(self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    pub fn append_value(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if !self.is_empty() {
            for edge in [self.min, self.max] {
                let gap = (value - edge).abs();
                if gap > 0.0 && gap < self.min_delta {
                    self.min_delta = gap;
                }
            }
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn append_bounds(&mut self, other: AxisBounds) {
        if other.is_empty() {
            return;
        }
        self.append_value(other.min);
        self.append_value(other.max);
        if other.min_delta < self.min_delta {
            self.min_delta = other.min_delta;
        }
    }

    /// Returns bounds safe for a log axis or a unit conversion divisor.
    #[must_use]
    pub fn clamped_positive(self) -> Self {
        let min = self.min.max(MIN_POSITIVE_BOUND);
        let max = self.max.max(min);
        Self {
            min,
            max,
            min_delta: self.min_delta,
        }
    }

    /// Widens a zero-width extent so scaling never divides by zero.
    #[must_use]
    pub fn widened_if_flat(self, unit_width: f64, logarithmic: bool) -> Self {
        if self.is_empty() || self.max > self.min {
            return self;
        }
        let (min, max) = if logarithmic {
            let center = self.min.max(MIN_POSITIVE_BOUND);
            (center / 10.0, center * 10.0)
        } else {
            let half = if self.min == 0.0 {
                unit_width
            } else {
                self.min.abs() * 0.5
            };
            (self.min - half, self.max + half)
        };
        Self {
            min,
            max,
            min_delta: self.min_delta,
        }
    }
}

/// Bounds of a series over both plot dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionalBounds {
    pub primary: AxisBounds,
    pub secondary: AxisBounds,
}

impl DimensionalBounds {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.primary.is_empty() || self.secondary.is_empty()
    }
}
