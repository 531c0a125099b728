//! Iso-displacement and iso-acceleration lines across the tripartite grid.
//!
//! Along a line of constant displacement `d`, pseudo-velocity grows with
//! frequency (`v = d·2π·f`); along constant acceleration `a` it falls
//! (`v = a/(2π·f)`). On period axes both slopes flip. Every line is clipped
//! twice, once where it enters the plot rectangle and once where it leaves,
//! so no segment sticks out of the draw margin.

use serde::{Deserialize, Serialize};

use crate::core::log_steps::{approx_equal, generate_steps};
use crate::core::scale::AxisScaler;
use crate::core::types::{DataPoint, Point, Rect};
use crate::core::units::{self, TripartiteUnit, format_number};
use crate::error::{ChartError, ChartResult};

/// Labels whose midpoint lands this close to a draw-margin edge, or to its
/// center, are not drawn.
pub const LABEL_PADDING_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagonalFamily {
    Displacement,
    Acceleration,
}

/// One diagonal segment in data space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagonalLine {
    pub family: DiagonalFamily,
    /// Displacement or acceleration this line holds constant.
    pub value: f64,
    pub start: DataPoint,
    pub end: DataPoint,
    pub label: Option<String>,
}

/// Visible frequency/velocity rectangle the lines are clipped against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRange {
    pub min_f: f64,
    pub max_f: f64,
    pub min_v: f64,
    pub max_v: f64,
}

impl PlotRange {
    #[must_use]
    pub const fn new(min_f: f64, max_f: f64, min_v: f64, max_v: f64) -> Self {
        Self {
            min_f,
            max_f,
            min_v,
            max_v,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        let values = [self.min_f, self.max_f, self.min_v, self.max_v];
        if values.iter().any(|value| !value.is_finite() || *value <= 0.0) {
            return Err(ChartError::InvalidRange(format!(
                "diagonal range must be finite and > 0, got f={}..{} v={}..{}",
                self.min_f, self.max_f, self.min_v, self.max_v
            )));
        }
        if self.min_f >= self.max_f {
            return Err(ChartError::InvalidRange(format!(
                "min frequency {} must be < max frequency {}",
                self.min_f, self.max_f
            )));
        }
        if self.min_v >= self.max_v {
            return Err(ChartError::InvalidRange(format!(
                "min velocity {} must be < max velocity {}",
                self.min_v, self.max_v
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(self, point: DataPoint) -> bool {
        point.x >= self.min_f
            && point.x <= self.max_f
            && point.y >= self.min_v
            && point.y <= self.max_v
    }

    fn clamp(self, point: DataPoint) -> DataPoint {
        DataPoint::new(
            point.x.clamp(self.min_f, self.max_f),
            point.y.clamp(self.min_v, self.max_v),
        )
    }
}

/// Conversion functions for one family plus its slope on the current axis.
struct Quantity {
    family: DiagonalFamily,
    forward: fn(f64, f64, &TripartiteUnit) -> f64,
    velocity_at: fn(f64, f64, &TripartiteUnit) -> f64,
    frequency_at: fn(f64, f64, &TripartiteUnit) -> f64,
    rising: bool,
}

impl Quantity {
    fn for_family(family: DiagonalFamily, is_x_reciprocal: bool) -> Self {
        match family {
            DiagonalFamily::Displacement => Self {
                family,
                forward: units::displacement,
                velocity_at: units::velocity_from_displacement,
                frequency_at: units::frequency_from_displacement,
                rising: !is_x_reciprocal,
            },
            DiagonalFamily::Acceleration => Self {
                family,
                forward: units::acceleration,
                velocity_at: units::velocity_from_acceleration,
                frequency_at: units::frequency_from_acceleration,
                rising: is_x_reciprocal,
            },
        }
    }

    fn unit_label<'a>(&self, unit: &'a TripartiteUnit) -> &'a str {
        match self.family {
            DiagonalFamily::Displacement => &unit.displacement_unit,
            DiagonalFamily::Acceleration => &unit.acceleration_unit,
        }
    }
}

pub fn generate_displacement_lines(
    min_f: f64,
    max_f: f64,
    min_v: f64,
    max_v: f64,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    let unit = unit.clone().with_x_reciprocal(false);
    generate_family(
        DiagonalFamily::Displacement,
        PlotRange::new(min_f, max_f, min_v, max_v),
        &unit,
        has_subseparators,
        log_base,
    )
}

pub fn generate_acceleration_lines(
    min_f: f64,
    max_f: f64,
    min_v: f64,
    max_v: f64,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    let unit = unit.clone().with_x_reciprocal(false);
    generate_family(
        DiagonalFamily::Acceleration,
        PlotRange::new(min_f, max_f, min_v, max_v),
        &unit,
        has_subseparators,
        log_base,
    )
}

/// Displacement lines for an X axis carrying period instead of frequency.
pub fn generate_displacement_reciprocal_lines(
    min_f: f64,
    max_f: f64,
    min_v: f64,
    max_v: f64,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    let unit = unit.clone().with_x_reciprocal(true);
    generate_family(
        DiagonalFamily::Displacement,
        PlotRange::new(min_f, max_f, min_v, max_v),
        &unit,
        has_subseparators,
        log_base,
    )
}

/// Acceleration lines for an X axis carrying period instead of frequency.
pub fn generate_acceleration_reciprocal_lines(
    min_f: f64,
    max_f: f64,
    min_v: f64,
    max_v: f64,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    let unit = unit.clone().with_x_reciprocal(true);
    generate_family(
        DiagonalFamily::Acceleration,
        PlotRange::new(min_f, max_f, min_v, max_v),
        &unit,
        has_subseparators,
        log_base,
    )
}

/// Generates one family, following `unit.is_x_reciprocal` for the slope.
pub fn generate_lines(
    family: DiagonalFamily,
    range: PlotRange,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    generate_family(family, range, unit, has_subseparators, log_base)
}

fn generate_family(
    family: DiagonalFamily,
    range: PlotRange,
    unit: &TripartiteUnit,
    has_subseparators: bool,
    log_base: f64,
) -> ChartResult<Vec<DiagonalLine>> {
    range.validate()?;
    let quantity = Quantity::for_family(family, unit.is_x_reciprocal);

    // The extreme values are reached at opposite corners: for displacement
    // on a frequency axis the minimum sits at (max_f, min_v) and the maximum
    // at (min_f, max_v); the other cases pair the remaining two corners.
    let corners = [
        (quantity.forward)(range.min_f, range.min_v, unit),
        (quantity.forward)(range.min_f, range.max_v, unit),
        (quantity.forward)(range.max_f, range.min_v, unit),
        (quantity.forward)(range.max_f, range.max_v, unit),
    ];
    let min_value = corners.iter().copied().fold(f64::INFINITY, f64::min);
    let max_value = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let steps = generate_steps(log_base, min_value, max_value, has_subseparators)?;
    let unit_label = quantity.unit_label(unit);

    let lines: Vec<DiagonalLine> = steps
        .into_iter()
        .filter_map(|step| {
            let (start, end) = clip_line(&quantity, range, unit, step.value);
            if is_degenerate(start, end) {
                return None;
            }
            Some(DiagonalLine {
                family,
                value: step.value,
                start,
                end,
                label: step
                    .is_labeled
                    .then(|| format!("{} {}", format_number(step.value), unit_label)),
            })
        })
        .collect();
    Ok(lines)
}

fn clip_line(
    quantity: &Quantity,
    range: PlotRange,
    unit: &TripartiteUnit,
    value: f64,
) -> (DataPoint, DataPoint) {
    let velocity_at = |x: f64| (quantity.velocity_at)(x, value, unit);
    let frequency_at = |y: f64| (quantity.frequency_at)(y, value, unit);

    // Rising lines enter through the bottom or left edge and leave through
    // the top or right edge; falling lines enter left/top, leave bottom/right.
    let (entry_v, exit_v) = if quantity.rising {
        (range.min_v, range.max_v)
    } else {
        (range.max_v, range.min_v)
    };

    let mut start = DataPoint::new(range.min_f, velocity_at(range.min_f));
    let start_outside = if quantity.rising {
        start.y < range.min_v
    } else {
        start.y > range.max_v
    };
    if start_outside {
        start = DataPoint::new(frequency_at(entry_v), entry_v);
    }

    let mut end = DataPoint::new(frequency_at(exit_v), exit_v);
    if end.x > range.max_f {
        end = DataPoint::new(range.max_f, velocity_at(range.max_f));
    }

    (range.clamp(start), range.clamp(end))
}

fn is_degenerate(start: DataPoint, end: DataPoint) -> bool {
    !start.is_finite()
        || !end.is_finite()
        || (approx_equal(start.x, end.x) && approx_equal(start.y, end.y))
}

/// Pixel position and rotation of one diagonal label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagonalLabelPlacement {
    pub position: Point,
    pub rotation_deg: f32,
}

/// Places a label at the pixel midpoint of `line`, rotated along it.
///
/// Returns `None` when the midpoint falls inside the padding band along the
/// draw-margin edges or inside the padding box around the margin center,
/// where the two families cross.
#[must_use]
pub fn place_label(
    line: &DiagonalLine,
    x_scaler: &AxisScaler,
    y_scaler: &AxisScaler,
    draw_margin: Rect,
) -> Option<DiagonalLabelPlacement> {
    let start = Point::new(x_scaler.to_pixels(line.start.x), y_scaler.to_pixels(line.start.y));
    let end = Point::new(x_scaler.to_pixels(line.end.x), y_scaler.to_pixels(line.end.y));
    let midpoint = Point::new((start.x + end.x) * 0.5, (start.y + end.y) * 0.5);

    let near_edge = midpoint.x < draw_margin.left() + LABEL_PADDING_PX
        || midpoint.x > draw_margin.right() - LABEL_PADDING_PX
        || midpoint.y < draw_margin.top() + LABEL_PADDING_PX
        || midpoint.y > draw_margin.bottom() - LABEL_PADDING_PX;
    let center = draw_margin.center();
    let near_center = (midpoint.x - center.x).abs() < LABEL_PADDING_PX
        && (midpoint.y - center.y).abs() < LABEL_PADDING_PX;
    if near_edge || near_center {
        return None;
    }

    let rotation_deg = (end.y - start.y).atan2(end.x - start.x).to_degrees();
    Some(DiagonalLabelPlacement {
        position: midpoint,
        rotation_deg,
    })
}
