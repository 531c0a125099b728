mod axis;
mod axis_layout;
mod chart_config;
mod diagonal_separators;
mod engine;
mod interaction_coordinator;
mod labeler;
mod layout_coordinator;
mod separators;
mod series;

pub use axis::{AxisConfig, AxisStyle, TripartiteAxis};
pub use axis_layout::{AxisLayoutEngine, MeasureContext};
pub use chart_config::{ChartConfig, ChartTheme, DrawMarginOverride, UnitSelection};
pub use diagonal_separators::{
    DiagonalAxis, DiagonalContext, DiagonalSeparators, family_of, generate_family_lines,
};
pub use engine::TripartiteChart;
pub use interaction_coordinator::CrosshairReadout;
pub use labeler::{LabelFormatError, LabelFormatterFn, Labeler};
pub use separators::{ChartId, SeparatorKey, SeparatorMap, SeparatorState, VisualSeparator};
pub use series::{ChartPoint, ChartSeries, HitPoints, HitStrategy, LineSeries, SeriesScalers};
