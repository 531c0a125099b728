use approx::assert_relative_eq;
use proptest::prelude::*;
use tripartite_rs::core::{AxisBounds, AxisOrientation, AxisScaler, AxisSpec, Point, Size};

const ORIGIN: Point = Point::new(40.0, 20.0);
const SIZE: Size = Size::new(900.0, 500.0);

#[test]
fn linear_x_axis_maps_left_to_right() {
    let spec = AxisSpec::new(AxisOrientation::X);
    let scaler =
        AxisScaler::new(ORIGIN, SIZE, &spec, AxisBounds::new(0.0, 100.0)).expect("valid scaler");

    assert_relative_eq!(scaler.to_pixels(0.0), 40.0);
    assert_relative_eq!(scaler.to_pixels(100.0), 940.0);
    assert_relative_eq!(scaler.to_pixels(50.0), 490.0);
}

#[test]
fn y_axis_grows_upwards() {
    let spec = AxisSpec::new(AxisOrientation::Y);
    let scaler =
        AxisScaler::new(ORIGIN, SIZE, &spec, AxisBounds::new(0.0, 10.0)).expect("valid scaler");

    assert_relative_eq!(scaler.to_pixels(0.0), 520.0);
    assert_relative_eq!(scaler.to_pixels(10.0), 20.0);
}

#[test]
fn inverted_axis_swaps_the_pixel_direction() {
    let spec = AxisSpec::new(AxisOrientation::X).with_inverted(true);
    let scaler =
        AxisScaler::new(ORIGIN, SIZE, &spec, AxisBounds::new(0.0, 100.0)).expect("valid scaler");

    assert_relative_eq!(scaler.to_pixels(0.0), 940.0);
    assert_relative_eq!(scaler.to_pixels(100.0), 40.0);
}

#[test]
fn log_axis_spaces_decades_evenly() {
    let spec = AxisSpec::logarithmic(AxisOrientation::X, 10.0);
    let scaler =
        AxisScaler::new(ORIGIN, SIZE, &spec, AxisBounds::new(0.1, 1000.0)).expect("valid scaler");

    assert_relative_eq!(scaler.to_pixels(1.0), 265.0, epsilon = 1e-3);
    assert_relative_eq!(scaler.to_pixels(10.0), 490.0, epsilon = 1e-3);
    assert_relative_eq!(scaler.to_pixels(100.0), 715.0, epsilon = 1e-3);
}

#[test]
fn unusable_bounds_are_rejected() {
    let linear = AxisSpec::new(AxisOrientation::X);
    let log = AxisSpec::logarithmic(AxisOrientation::X, 10.0);

    assert!(AxisScaler::new(ORIGIN, SIZE, &linear, AxisBounds::empty()).is_err());
    assert!(AxisScaler::new(ORIGIN, SIZE, &linear, AxisBounds::new(3.0, 3.0)).is_err());
    assert!(AxisScaler::new(ORIGIN, SIZE, &log, AxisBounds::new(0.0, 10.0)).is_err());
    assert!(
        AxisScaler::new(ORIGIN, Size::new(0.0, 0.0), &linear, AxisBounds::new(0.0, 1.0)).is_err()
    );
}

#[test]
fn flat_bounds_are_widened_before_scaling() {
    let linear = AxisBounds::new(4.0, 4.0).widened_if_flat(1.0, false);
    assert_relative_eq!(linear.min, 2.0);
    assert_relative_eq!(linear.max, 6.0);

    let zero = AxisBounds::new(0.0, 0.0).widened_if_flat(1.0, false);
    assert_relative_eq!(zero.min, -1.0);
    assert_relative_eq!(zero.max, 1.0);

    let log = AxisBounds::new(5.0, 5.0).widened_if_flat(1.0, true);
    assert_relative_eq!(log.min, 0.5);
    assert_relative_eq!(log.max, 50.0);
}

proptest! {
    #[test]
    fn linear_round_trip_property(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        factor in 0.0f64..1.0,
        vertical in any::<bool>()
    ) {
        let orientation = if vertical { AxisOrientation::Y } else { AxisOrientation::X };
        let spec = AxisSpec::new(orientation);
        let scaler = AxisScaler::new(ORIGIN, SIZE, &spec, AxisBounds::new(min, min + span))
            .expect("valid scaler");
        let value = min + factor * span;

        let recovered = scaler.to_chart_values(scaler.to_pixels(value));
        prop_assert!((recovered - value).abs() <= span * 1e-5);
    }

    #[test]
    fn log_round_trip_property(
        min_exponent in -6.0f64..3.0,
        decades in 0.1f64..8.0,
        factor in 0.0f64..1.0,
        log_base in prop_oneof![Just(10.0f64), Just(2.0f64)]
    ) {
        let min = 10f64.powf(min_exponent);
        let max = 10f64.powf(min_exponent + decades);
        let spec = AxisSpec::logarithmic(AxisOrientation::Y, log_base);
        let scaler = AxisScaler::new(ORIGIN, SIZE, &spec, AxisBounds::new(min, max))
            .expect("valid scaler");
        let value = 10f64.powf(min_exponent + factor * decades);

        let recovered = scaler.to_chart_values(scaler.to_pixels(value));
        let log_error = (recovered.ln() - value.ln()).abs();
        prop_assert!(log_error <= (max / min).ln() * 1e-5);
    }
}
