use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Sub-steps split the first in-range decade into sixths.
const SUB_STEP_DIVISIONS: i32 = 6;
/// Powers are snapped to the nearest integer within this distance so that
/// `log10(1000)` lands on 3 instead of 2.9999999999999996.
const POWER_SNAP_EPSILON: f64 = 1e-9;
/// Upper bound on decades walked in one call; base values barely above 1
/// otherwise turn a tiny range into millions of powers.
const MAX_POWERS: i64 = 10_000;

/// One "interesting" value on a logarithmic axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogStep {
    pub value: f64,
    pub is_labeled: bool,
}

impl LogStep {
    #[must_use]
    pub const fn labeled(value: f64) -> Self {
        Self {
            value,
            is_labeled: true,
        }
    }

    #[must_use]
    pub const fn unlabeled(value: f64) -> Self {
        Self {
            value,
            is_labeled: false,
        }
    }
}

/// Computes full, half and optional sub-steps strictly inside `(start, end)`.
///
/// For every power `p` between `ceil(log(start))` and `floor(log(end))` the
/// full step `base^p` and the half step `0.5·base^p` are emitted labeled when
/// strictly inside the range. Powers outside that span contribute nothing,
/// so a range ending at 800 stops at 100.
///
/// With `include_sub_steps`, the partial decade below the first full step
/// is filled with unlabeled values at `j/6` of each power. A half step that
/// falls in that partial decade is demoted to unlabeled so the labeled set
/// starts at the first full step.
pub fn generate_steps(
    log_base: f64,
    start: f64,
    end: f64,
    include_sub_steps: bool,
) -> ChartResult<Vec<LogStep>> {
    validate_range(log_base, start, end)?;

    let first_power = snapped_log(start, log_base, f64::ceil);
    let last_power = snapped_log(end, log_base, f64::floor);
    if last_power - first_power > MAX_POWERS {
        return Err(ChartError::InvalidRange(format!(
            "log range {start}..{end} in base {log_base} spans too many powers"
        )));
    }

    let first_full_step = (first_power..=last_power)
        .map(|power| power_of(log_base, power))
        .find(|value| strictly_between(*value, start, end))
        .unwrap_or(f64::INFINITY);
    let has_full_step = first_full_step.is_finite();

    let mut steps = Vec::new();
    for power in first_power..=last_power {
        let full = power_of(log_base, power);
        if strictly_between(full, start, end) {
            steps.push(LogStep::labeled(full));
        }

        let half = 0.5 * full;
        if strictly_between(half, start, end) {
            let demoted = include_sub_steps && has_full_step && half < first_full_step;
            steps.push(LogStep {
                value: half,
                is_labeled: !demoted,
            });
        }

        if include_sub_steps {
            for j in 1..SUB_STEP_DIVISIONS {
                let value = full * f64::from(j) / f64::from(SUB_STEP_DIVISIONS);
                if strictly_between(value, start, first_full_step) && value < end {
                    steps.push(LogStep::unlabeled(value));
                }
            }
        }
    }

    let steps = sort_and_merge(steps);
    trace!(
        log_base,
        start,
        end,
        include_sub_steps,
        count = steps.len(),
        "generated log steps"
    );
    Ok(steps)
}

fn validate_range(log_base: f64, start: f64, end: f64) -> ChartResult<()> {
    if !log_base.is_finite() || log_base <= 1.0 {
        return Err(ChartError::InvalidRange(format!(
            "log base must be finite and > 1, got {log_base}"
        )));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidRange(
            "log step range must be finite".to_owned(),
        ));
    }
    if start <= 0.0 || end <= 0.0 {
        return Err(ChartError::InvalidRange(format!(
            "log step range requires values > 0, got {start}..{end}"
        )));
    }
    if start >= end {
        return Err(ChartError::InvalidRange(format!(
            "log step range start {start} must be < end {end}"
        )));
    }
    Ok(())
}

fn snapped_log(value: f64, log_base: f64, round: fn(f64) -> f64) -> i64 {
    let exact = value.ln() / log_base.ln();
    let nearest = exact.round();
    let snapped = if (exact - nearest).abs() <= POWER_SNAP_EPSILON {
        nearest
    } else {
        round(exact)
    };
    snapped as i64
}

fn power_of(log_base: f64, power: i64) -> f64 {
    match i32::try_from(power) {
        Ok(power) => log_base.powi(power),
        Err(_) => log_base.powf(power as f64),
    }
}

fn strictly_between(value: f64, low: f64, high: f64) -> bool {
    value > low && value < high && !approx_equal(value, low) && !approx_equal(value, high)
}

fn sort_and_merge(mut steps: Vec<LogStep>) -> Vec<LogStep> {
    steps.sort_by(|lhs, rhs| lhs.value.total_cmp(&rhs.value));
    let mut merged: Vec<LogStep> = Vec::with_capacity(steps.len());
    for step in steps {
        match merged.last_mut() {
            Some(last) if approx_equal(last.value, step.value) => {
                last.is_labeled |= step.is_labeled;
            }
            _ => merged.push(step),
        }
    }
    merged
}

pub(crate) fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs());
    (lhs - rhs).abs() <= scale * 1e-12
}
