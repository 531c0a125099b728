use crate::core::axis::AxisOrientation;
use crate::error::{ChartError, ChartResult};

pub const AXIS_X_TARGET_SPACING_PX: f64 = 100.0;
pub const AXIS_Y_TARGET_SPACING_PX: f64 = 60.0;

/// Hard ceiling on separators enumerated by one axis in one pass.
pub const MAX_SEPARATORS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub magnitude: f64,
}

/// Picks a 1/2/5/10 multiple of a power of ten so that roughly one separator
/// lands every `target_spacing_px` pixels.
#[must_use]
pub fn nice_tick(min: f64, max: f64, span_px: f64, target_spacing_px: f64) -> AxisTick {
    let mut range = max - min;
    if range == 0.0 {
        range = min.abs();
    }
    if !range.is_finite() || range <= 0.0 {
        return AxisTick {
            value: 1.0,
            magnitude: 1.0,
        };
    }

    let separations = if span_px.is_finite() && target_spacing_px > 0.0 {
        (span_px / target_spacing_px).round().max(1.0)
    } else {
        1.0
    };
    let minimum = range / separations;
    let magnitude = 10_f64.powf(minimum.log10().floor());
    let residual = minimum / magnitude;
    let value = if residual > 5.0 {
        10.0 * magnitude
    } else if residual > 2.0 {
        5.0 * magnitude
    } else if residual > 1.0 {
        2.0 * magnitude
    } else {
        magnitude
    };

    AxisTick { value, magnitude }
}

#[must_use]
pub fn target_spacing_px(orientation: AxisOrientation) -> f64 {
    if orientation.is_horizontal() {
        AXIS_X_TARGET_SPACING_PX
    } else {
        AXIS_Y_TARGET_SPACING_PX
    }
}

/// Enumerates `floor(min/step)·step, +step, ... <= max`.
///
/// A zero, negative or NaN step never advances past `max`; the
/// `MAX_SEPARATORS` ceiling turns that into `ExcessiveSeparators` instead of
/// an endless loop.
pub fn linear_separator_values(
    min: f64,
    max: f64,
    step: f64,
    orientation: AxisOrientation,
) -> ChartResult<Vec<f64>> {
    let start = if step > 0.0 && step.is_finite() {
        (min / step).floor() * step
    } else {
        min
    };
    let tolerance = (step.abs() * 1e-9).max(f64::EPSILON);

    let mut values = Vec::new();
    let mut index = 0_u32;
    loop {
        let value = start + f64::from(index) * step;
        if value > max + tolerance {
            break;
        }
        values.push(normalize_zero(value));
        if values.len() > MAX_SEPARATORS {
            return Err(ChartError::ExcessiveSeparators {
                orientation,
                count: values.len(),
            });
        }
        index += 1;
    }
    Ok(values)
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::{linear_separator_values, nice_tick};
    use crate::core::AxisOrientation;

    #[test]
    fn nice_tick_rounds_up_to_one_two_five() {
        assert_eq!(nice_tick(0.0, 10.0, 500.0, 100.0).value, 2.0);
        assert_eq!(nice_tick(0.0, 100.0, 300.0, 100.0).value, 50.0);
        assert_eq!(nice_tick(0.0, 1000.0, 1000.0, 100.0).value, 100.0);
    }

    #[test]
    fn enumeration_starts_on_step_multiple() {
        let values =
            linear_separator_values(0.3, 2.0, 0.5, AxisOrientation::X).expect("enumerate");
        assert_eq!(values, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }
}
