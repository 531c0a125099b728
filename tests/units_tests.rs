use std::f64::consts::PI;

use approx::{assert_relative_eq, relative_eq};
use proptest::prelude::*;
use tripartite_rs::core::{
    TripartiteUnit, TripartiteUnitOption, UnitTable, acceleration, displacement, format_number,
    formatted_acceleration, formatted_displacement, frequency_from_acceleration,
    frequency_from_displacement, velocity_from_acceleration, velocity_from_displacement,
};

#[test]
fn format_number_switches_to_trimmed_scientific_below_threshold() {
    assert_eq!(format_number(0.00005), "5E-5");
    assert_eq!(format_number(0.000012), "1.2E-5");
}

#[test]
fn format_number_rounds_to_four_decimals() {
    assert_eq!(format_number(3.14159265), "3.1416");
    assert_eq!(format_number(10.0), "10");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(0.0001), "0.0001");
}

#[test]
fn displacement_and_acceleration_use_preset_scales() {
    let unit = TripartiteUnitOption::InchesG.unit();

    assert_relative_eq!(displacement(1.0, 2.0 * PI, &unit), 1.0, max_relative = 1e-12);
    assert_relative_eq!(
        acceleration(1.0, 386.1 / (2.0 * PI), &unit),
        1.0,
        max_relative = 1e-12
    );
    assert_eq!(formatted_displacement(1.0, 2.0 * PI, &unit), "1 in.");
    assert_eq!(formatted_acceleration(1.0, 386.1 / (2.0 * PI), &unit), "1 g");
}

#[test]
fn period_presets_invert_the_x_value() {
    let frequency = TripartiteUnitOption::MetersG.unit();
    let period = TripartiteUnitOption::MetersGPeriod.unit();
    assert!(period.is_x_reciprocal);
    assert_eq!(period.x_unit, "sec");

    assert_relative_eq!(
        displacement(0.5, 3.0, &period),
        displacement(2.0, 3.0, &frequency),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        acceleration(0.5, 3.0, &period),
        acceleration(2.0, 3.0, &frequency),
        max_relative = 1e-12
    );
}

#[test]
fn unit_table_serves_presets_and_registered_units() {
    let custom = TripartiteUnit::new("µm", 1e-3, "mg", 1e-3).with_axis_units("Hz", "µm/s");
    let table = UnitTable::standard()
        .with_custom("micro", custom.clone())
        .expect("valid custom unit");

    assert_eq!(table.presets().count(), TripartiteUnitOption::ALL.len());
    assert_eq!(table.preset(TripartiteUnitOption::FeetG).displacement_unit, "ft.");
    assert_eq!(table.custom("micro"), Some(&custom));
    assert!(table.custom("missing").is_none());
}

#[test]
fn unit_table_rejects_invalid_scales() {
    let broken = TripartiteUnit::new("in.", 0.0, "g", 386.1);
    assert!(UnitTable::standard().with_custom("broken", broken).is_err());
}

proptest! {
    #[test]
    fn displacement_round_trips_for_every_preset(
        x in 0.01f64..1_000.0,
        y in 0.001f64..1_000.0,
        option_index in 0usize..12
    ) {
        let unit = TripartiteUnitOption::ALL[option_index].unit();
        let d = displacement(x, y, &unit);

        prop_assert!(relative_eq!(velocity_from_displacement(x, d, &unit), y, max_relative = 1e-9));
        prop_assert!(relative_eq!(frequency_from_displacement(y, d, &unit), x, max_relative = 1e-9));
    }

    #[test]
    fn acceleration_round_trips_for_every_preset(
        x in 0.01f64..1_000.0,
        y in 0.001f64..1_000.0,
        option_index in 0usize..12
    ) {
        let unit = TripartiteUnitOption::ALL[option_index].unit();
        let a = acceleration(x, y, &unit);

        prop_assert!(relative_eq!(velocity_from_acceleration(x, a, &unit), y, max_relative = 1e-9));
        prop_assert!(relative_eq!(frequency_from_acceleration(y, a, &unit), x, max_relative = 1e-9));
    }
}
