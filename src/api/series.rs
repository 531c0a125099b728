use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AxisBounds, AxisScaler, DataPoint, DimensionalBounds, Point};
use crate::error::{ChartError, ChartResult};

/// How the distance between a pointer and a point is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitStrategy {
    #[default]
    ClosestToPointer,
    CompareOnlyX,
    CompareOnlyY,
}

impl HitStrategy {
    #[must_use]
    pub fn distance(self, pointer: Point, candidate: Point) -> f32 {
        match self {
            Self::ClosestToPointer => pointer.distance_to(candidate),
            Self::CompareOnlyX => (pointer.x - candidate.x).abs(),
            Self::CompareOnlyY => (pointer.y - candidate.y).abs(),
        }
    }
}

/// Scalers of the axes a series is plotted against.
#[derive(Debug, Clone, Copy)]
pub struct SeriesScalers<'a> {
    pub x: &'a AxisScaler,
    pub y: &'a AxisScaler,
}

impl SeriesScalers<'_> {
    #[must_use]
    pub fn to_pixels(&self, point: DataPoint) -> Point {
        Point::new(self.x.to_pixels(point.x), self.y.to_pixels(point.y))
    }
}

/// A data point returned by hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub data: DataPoint,
    pub pixel: Point,
    pub distance_px: f32,
}

pub type HitPoints = SmallVec<[ChartPoint; 4]>;

/// Data source a tripartite chart seeds its axes from and hit-tests against.
pub trait ChartSeries: fmt::Debug {
    fn name(&self) -> &str;

    fn is_visible(&self) -> bool {
        true
    }

    fn x_axis_index(&self) -> usize {
        0
    }

    fn y_axis_index(&self) -> usize {
        0
    }

    /// Primary is the X extent, secondary the Y extent.
    fn bounds(&self) -> DimensionalBounds;

    /// Points nearest to `pointer` under `strategy`; ties are all returned.
    fn find_hit_points(
        &self,
        scalers: SeriesScalers<'_>,
        pointer: Point,
        strategy: HitStrategy,
    ) -> HitPoints;
}

/// Polyline series of frequency/pseudo-velocity samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<DataPoint>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub x_axis_index: usize,
    #[serde(default)]
    pub y_axis_index: usize,
}

fn default_visible() -> bool {
    true
}

impl LineSeries {
    /// Builds a series, rejecting non-finite samples.
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> ChartResult<Self> {
        if let Some(point) = points.iter().find(|point| !point.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "series point ({}, {}) must be finite",
                point.x, point.y
            )));
        }
        Ok(Self {
            name: name.into(),
            points,
            is_visible: true,
            x_axis_index: 0,
            y_axis_index: 0,
        })
    }

    #[must_use]
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    #[must_use]
    pub fn with_axes(mut self, x_axis_index: usize, y_axis_index: usize) -> Self {
        self.x_axis_index = x_axis_index;
        self.y_axis_index = y_axis_index;
        self
    }
}

impl ChartSeries for LineSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn x_axis_index(&self) -> usize {
        self.x_axis_index
    }

    fn y_axis_index(&self) -> usize {
        self.y_axis_index
    }

    fn bounds(&self) -> DimensionalBounds {
        let mut primary = AxisBounds::empty();
        let mut secondary = AxisBounds::empty();
        for point in &self.points {
            primary.append_value(point.x);
            secondary.append_value(point.y);
        }
        DimensionalBounds { primary, secondary }
    }

    fn find_hit_points(
        &self,
        scalers: SeriesScalers<'_>,
        pointer: Point,
        strategy: HitStrategy,
    ) -> HitPoints {
        let candidates: Vec<ChartPoint> = self
            .points
            .iter()
            .map(|point| {
                let pixel = scalers.to_pixels(*point);
                ChartPoint {
                    data: *point,
                    pixel,
                    distance_px: strategy.distance(pointer, pixel),
                }
            })
            .filter(|candidate| candidate.distance_px.is_finite())
            .collect();

        let Some(best) = candidates
            .iter()
            .map(|candidate| OrderedFloat(candidate.distance_px))
            .min()
        else {
            return HitPoints::new();
        };
        candidates
            .into_iter()
            .filter(|candidate| OrderedFloat(candidate.distance_px) == best)
            .collect()
    }
}
