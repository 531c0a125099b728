use approx::assert_relative_eq;
use proptest::prelude::*;
use tripartite_rs::core::{LogStep, generate_steps};

fn labeled_values(steps: &[LogStep]) -> Vec<f64> {
    steps
        .iter()
        .filter(|step| step.is_labeled)
        .map(|step| step.value)
        .collect()
}

/// Smallest integer power of `log_base` strictly inside `(start, end)`.
fn first_full_step(log_base: f64, start: f64, end: f64) -> Option<f64> {
    let first = start.log(log_base).floor() as i32;
    let last = end.log(log_base).ceil() as i32;
    (first..=last)
        .map(|power| log_base.powi(power))
        .find(|value| {
            *value > start
                && *value < end
                && (value - start).abs() > start * 1e-9
                && (end - value).abs() > end * 1e-9
        })
}

#[test]
fn decade_range_labels_full_and_half_steps() {
    let steps = generate_steps(10.0, 0.1, 1000.0, true).expect("valid range");

    let labeled = labeled_values(&steps);
    let expected = [1.0, 5.0, 10.0, 50.0, 100.0, 500.0];
    assert_eq!(labeled.len(), expected.len());
    for (actual, expected) in labeled.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, max_relative = 1e-12);
    }

    let unlabeled: Vec<f64> = steps
        .iter()
        .filter(|step| !step.is_labeled)
        .map(|step| step.value)
        .collect();
    assert_eq!(unlabeled.len(), 5);
    for (index, value) in unlabeled.iter().enumerate() {
        assert!(*value > 0.1 && *value < 1.0);
        assert_relative_eq!(*value, (index + 1) as f64 / 6.0, max_relative = 1e-12);
    }
}

#[test]
fn sub_steps_are_omitted_when_disabled() {
    let steps = generate_steps(10.0, 0.1, 1000.0, false).expect("valid range");
    assert!(steps.iter().all(|step| step.is_labeled));
    assert_relative_eq!(steps[0].value, 0.5, max_relative = 1e-12);
}

#[test]
fn half_steps_stop_at_the_last_full_power() {
    let steps = generate_steps(10.0, 2.0, 800.0, false).expect("valid range");
    let labeled = labeled_values(&steps);

    let expected = [5.0, 10.0, 50.0, 100.0];
    assert_eq!(labeled.len(), expected.len());
    for (actual, expected) in labeled.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, max_relative = 1e-12);
    }
}

#[test]
fn range_without_a_full_power_has_no_steps() {
    let steps = generate_steps(10.0, 2.0, 8.0, true).expect("valid range");
    assert!(steps.is_empty());
}

#[test]
fn invalid_ranges_are_rejected() {
    assert!(generate_steps(1.0, 0.1, 10.0, false).is_err());
    assert!(generate_steps(10.0, 0.0, 10.0, false).is_err());
    assert!(generate_steps(10.0, 10.0, 10.0, false).is_err());
    assert!(generate_steps(10.0, 5.0, f64::INFINITY, false).is_err());
}

proptest! {
    #[test]
    fn steps_ascend_strictly_inside_the_range(
        log_base in prop_oneof![Just(10.0f64), Just(2.0f64), 1.5f64..20.0],
        start in 1e-3f64..1e3,
        ratio in 1.001f64..1e4,
        include_sub_steps in any::<bool>()
    ) {
        let end = start * ratio;
        let steps = generate_steps(log_base, start, end, include_sub_steps).expect("valid range");

        for pair in steps.windows(2) {
            prop_assert!(pair[0].value < pair[1].value);
        }
        for step in &steps {
            prop_assert!(step.value > start && step.value < end);
        }

        if include_sub_steps {
            if let Some(first_full) = first_full_step(log_base, start, end) {
                for step in steps.iter().filter(|step| !step.is_labeled) {
                    prop_assert!(step.value < first_full * (1.0 + 1e-9));
                }
            }
        } else {
            prop_assert!(steps.iter().all(|step| step.is_labeled));
        }
    }
}
