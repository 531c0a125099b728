//! Physical unit conversions between the four tripartite quantities.
//!
//! The X axis carries frequency (or period when `is_x_reciprocal` is set), the
//! Y axis pseudo-velocity, and the two diagonal families carry displacement
//! and acceleration:
//!
//! - `d = v / (2π·f) / displacement_scale`
//! - `a = v · 2π·f / acceleration_scale`
//!
//! with `f = 1/x` for period axes. None of these functions guard against a
//! zero `x`; the layout coordinator clamps bounds away from zero first.

use std::f64::consts::PI;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

const SCIENTIFIC_THRESHOLD: f64 = 1e-4;
const FORMAT_DECIMALS: u32 = 4;

/// Unit labels and scale factors used by the conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripartiteUnit {
    pub x_unit: String,
    pub y_unit: String,
    pub displacement_unit: String,
    #[serde(default = "default_scale")]
    pub displacement_scale: f64,
    pub acceleration_unit: String,
    #[serde(default = "default_scale")]
    pub acceleration_scale: f64,
    #[serde(default)]
    pub is_x_reciprocal: bool,
}

fn default_scale() -> f64 {
    1.0
}

impl TripartiteUnit {
    #[must_use]
    pub fn new(
        displacement_unit: impl Into<String>,
        displacement_scale: f64,
        acceleration_unit: impl Into<String>,
        acceleration_scale: f64,
    ) -> Self {
        Self {
            x_unit: "Hertz".to_owned(),
            y_unit: String::new(),
            displacement_unit: displacement_unit.into(),
            displacement_scale,
            acceleration_unit: acceleration_unit.into(),
            acceleration_scale,
            is_x_reciprocal: false,
        }
    }

    #[must_use]
    pub fn with_axis_units(mut self, x_unit: impl Into<String>, y_unit: impl Into<String>) -> Self {
        self.x_unit = x_unit.into();
        self.y_unit = y_unit.into();
        self
    }

    #[must_use]
    pub fn with_x_reciprocal(mut self, is_x_reciprocal: bool) -> Self {
        self.is_x_reciprocal = is_x_reciprocal;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, scale) in [
            ("displacement", self.displacement_scale),
            ("acceleration", self.acceleration_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} scale must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    fn angular(&self, x: f64) -> f64 {
        let frequency = if self.is_x_reciprocal { 1.0 / x } else { x };
        2.0 * PI * frequency
    }
}

/// Built-in unit presets.
///
/// Each frequency preset has a `*Period` twin whose X axis is period in
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TripartiteUnitOption {
    #[default]
    InchesG,
    FeetG,
    MillimetersG,
    CentimetersG,
    MetersG,
    MetersPerSecondSquared,
    InchesGPeriod,
    FeetGPeriod,
    MillimetersGPeriod,
    CentimetersGPeriod,
    MetersGPeriod,
    MetersPerSecondSquaredPeriod,
}

impl TripartiteUnitOption {
    pub const ALL: [TripartiteUnitOption; 12] = [
        Self::InchesG,
        Self::FeetG,
        Self::MillimetersG,
        Self::CentimetersG,
        Self::MetersG,
        Self::MetersPerSecondSquared,
        Self::InchesGPeriod,
        Self::FeetGPeriod,
        Self::MillimetersGPeriod,
        Self::CentimetersGPeriod,
        Self::MetersGPeriod,
        Self::MetersPerSecondSquaredPeriod,
    ];

    #[must_use]
    pub fn is_period(self) -> bool {
        matches!(
            self,
            Self::InchesGPeriod
                | Self::FeetGPeriod
                | Self::MillimetersGPeriod
                | Self::CentimetersGPeriod
                | Self::MetersGPeriod
                | Self::MetersPerSecondSquaredPeriod
        )
    }

    fn frequency_unit(self) -> TripartiteUnit {
        // 1 g expressed in each length unit per second squared.
        let (length, velocity, g_scale, acceleration) = match self {
            Self::InchesG | Self::InchesGPeriod => ("in.", "in/sec", 386.1, "g"),
            Self::FeetG | Self::FeetGPeriod => ("ft.", "ft/sec", 32.2, "g"),
            Self::MillimetersG | Self::MillimetersGPeriod => ("mm.", "mm/sec", 9810.0, "g"),
            Self::CentimetersG | Self::CentimetersGPeriod => ("cm.", "cm/sec", 981.0, "g"),
            Self::MetersG | Self::MetersGPeriod => ("m.", "m/sec", 9.81, "g"),
            Self::MetersPerSecondSquared | Self::MetersPerSecondSquaredPeriod => {
                ("m.", "m/sec", 1.0, "m/sec²")
            }
        };
        TripartiteUnit::new(length, 1.0, acceleration, g_scale).with_axis_units("Hertz", velocity)
    }

    #[must_use]
    pub fn unit(self) -> TripartiteUnit {
        let mut unit = self.frequency_unit();
        if self.is_period() {
            unit.x_unit = "sec".to_owned();
            unit.is_x_reciprocal = true;
        }
        unit
    }
}

/// Immutable lookup of presets plus host-registered units.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable {
    presets: IndexMap<TripartiteUnitOption, TripartiteUnit>,
    custom: IndexMap<String, TripartiteUnit>,
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl UnitTable {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            presets: TripartiteUnitOption::ALL
                .into_iter()
                .map(|option| (option, option.unit()))
                .collect(),
            custom: IndexMap::new(),
        }
    }

    /// Returns a copy of this table with `unit` registered under `name`.
    pub fn with_custom(mut self, name: impl Into<String>, unit: TripartiteUnit) -> ChartResult<Self> {
        unit.validate()?;
        self.custom.insert(name.into(), unit);
        Ok(self)
    }

    #[must_use]
    pub fn preset(&self, option: TripartiteUnitOption) -> &TripartiteUnit {
        self.presets
            .get(&option)
            .unwrap_or_else(|| &self.presets[0])
    }

    #[must_use]
    pub fn custom(&self, name: &str) -> Option<&TripartiteUnit> {
        self.custom.get(name)
    }

    pub fn presets(&self) -> impl Iterator<Item = (TripartiteUnitOption, &TripartiteUnit)> {
        self.presets.iter().map(|(option, unit)| (*option, unit))
    }
}

#[must_use]
pub fn displacement(x: f64, y: f64, unit: &TripartiteUnit) -> f64 {
    y / unit.angular(x) / unit.displacement_scale
}

#[must_use]
pub fn velocity_from_displacement(x: f64, d: f64, unit: &TripartiteUnit) -> f64 {
    d * unit.angular(x) * unit.displacement_scale
}

#[must_use]
pub fn frequency_from_displacement(y: f64, d: f64, unit: &TripartiteUnit) -> f64 {
    let denominator = d * 2.0 * PI * unit.displacement_scale;
    if unit.is_x_reciprocal {
        denominator / y
    } else {
        y / denominator
    }
}

#[must_use]
pub fn acceleration(x: f64, y: f64, unit: &TripartiteUnit) -> f64 {
    y * unit.angular(x) / unit.acceleration_scale
}

#[must_use]
pub fn velocity_from_acceleration(x: f64, a: f64, unit: &TripartiteUnit) -> f64 {
    a * unit.acceleration_scale / unit.angular(x)
}

#[must_use]
pub fn frequency_from_acceleration(y: f64, a: f64, unit: &TripartiteUnit) -> f64 {
    if unit.is_x_reciprocal {
        y * 2.0 * PI / (a * unit.acceleration_scale)
    } else {
        a * unit.acceleration_scale / (y * 2.0 * PI)
    }
}

/// Displacement at `(x, y)` rendered as `"<number> <unit>"`.
#[must_use]
pub fn formatted_displacement(x: f64, y: f64, unit: &TripartiteUnit) -> String {
    format!(
        "{} {}",
        format_number(displacement(x, y, unit)),
        unit.displacement_unit
    )
}

#[must_use]
pub fn formatted_acceleration(x: f64, y: f64, unit: &TripartiteUnit) -> String {
    format!(
        "{} {}",
        format_number(acceleration(x, y, unit)),
        unit.acceleration_unit
    )
}

/// Formats a diagonal-line or axis value for display.
///
/// Values below `1e-4` in magnitude use scientific notation with a trimmed
/// mantissa (`5E-5`). Everything else is rounded half-to-even to four decimals
/// with trailing zeros removed (`3.1416`, `10`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    if value.abs() < SCIENTIFIC_THRESHOLD {
        return format_scientific(value);
    }

    match Decimal::try_from(value) {
        Ok(decimal) => decimal.round_dp(FORMAT_DECIMALS).normalize().to_string(),
        // Out of decimal range; the magnitude makes the fraction irrelevant.
        Err(_) => format!("{value:.0}"),
    }
}

fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.4E}", value);
    let Some((mantissa, exponent)) = formatted.split_once('E') else {
        return formatted;
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    format!("{mantissa}E{exponent}")
}
