pub mod axis;
pub mod bounds;
pub mod diagonal;
pub mod log_steps;
pub mod scale;
pub mod ticks;
pub mod types;
pub mod units;

pub use axis::{AxisOrientation, AxisPosition, AxisSpec};
pub use bounds::{AxisBounds, DimensionalBounds, MIN_POSITIVE_BOUND};
pub use diagonal::{
    DiagonalFamily, DiagonalLabelPlacement, DiagonalLine, LABEL_PADDING_PX, PlotRange,
    generate_acceleration_lines, generate_acceleration_reciprocal_lines,
    generate_displacement_lines, generate_displacement_reciprocal_lines, generate_lines,
    place_label,
};
pub use log_steps::{LogStep, generate_steps};
pub use scale::AxisScaler;
pub use ticks::{AxisTick, MAX_SEPARATORS, linear_separator_values, nice_tick};
pub use types::{DataPoint, Margin, Point, Rect, Size, Viewport};
pub use units::{
    TripartiteUnit, TripartiteUnitOption, UnitTable, acceleration, displacement, format_number,
    formatted_acceleration, formatted_displacement, frequency_from_acceleration,
    frequency_from_displacement, velocity_from_acceleration, velocity_from_displacement,
};
