use crate::config::{BoundsArgs, GenerationConfig, MassMode, PositionRange, VelocityMode};
use crate::error::ConfigError;

fn valid_config() -> GenerationConfig {
    BoundsArgs::default().resolve(10)
}

#[test]
fn test_defaults_resolve_to_ranges() {
    let config = valid_config();
    assert_eq!(config.count, 10);
    assert_eq!(config.mass, MassMode::Range { min: 0.1, max: 1.0 });
    assert_eq!(config.position, PositionRange { min: -1.0, max: 1.0 });
    assert_eq!(config.velocity, VelocityMode::Range { min: 0.0, max: 1.0 });
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_fixed_values_override_ranges() {
    let args = BoundsArgs {
        mass: Some(2.0),
        velocity: Some(0.5),
        ..BoundsArgs::default()
    };
    let config = args.resolve(3);
    assert_eq!(config.mass, MassMode::Fixed { value: 2.0 });
    assert_eq!(config.velocity, VelocityMode::Fixed { value: 0.5 });
}

#[test]
fn test_zero_velocity_resolves_to_zero_mode() {
    let fixed_zero = BoundsArgs {
        velocity: Some(0.0),
        ..BoundsArgs::default()
    };
    assert_eq!(fixed_zero.resolve(1).velocity, VelocityMode::Zero);

    let collapsed_range = BoundsArgs {
        max_velocity: 0.0,
        ..BoundsArgs::default()
    };
    assert_eq!(collapsed_range.resolve(1).velocity, VelocityMode::Zero);
}

#[test]
fn test_min_mass_zero_is_rejected() {
    let args = BoundsArgs {
        min_mass: 0.0,
        ..BoundsArgs::default()
    };
    assert_eq!(
        args.resolve(1).validate(),
        Err(ConfigError::MinMassNotPositive)
    );
}

#[test]
fn test_max_mass_below_min_is_rejected() {
    let args = BoundsArgs {
        min_mass: 2.0,
        max_mass: 1.0,
        ..BoundsArgs::default()
    };
    assert_eq!(args.resolve(1).validate(), Err(ConfigError::MaxMassBelowMin));
}

#[test]
fn test_fixed_mass_must_be_positive() {
    let args = BoundsArgs {
        mass: Some(-1.0),
        ..BoundsArgs::default()
    };
    assert_eq!(args.resolve(1).validate(), Err(ConfigError::MassNotPositive));
}

#[test]
fn test_position_range_must_be_non_empty() {
    for max in [-1.0, -2.0] {
        let args = BoundsArgs {
            max_position: max,
            ..BoundsArgs::default()
        };
        assert_eq!(
            args.resolve(1).validate(),
            Err(ConfigError::PositionRangeEmpty)
        );
    }
}

#[test]
fn test_velocity_bounds_are_checked() {
    let negative_min = BoundsArgs {
        min_velocity: -0.5,
        ..BoundsArgs::default()
    };
    assert_eq!(
        negative_min.resolve(1).validate(),
        Err(ConfigError::MinVelocityNegative)
    );

    let inverted = BoundsArgs {
        min_velocity: 2.0,
        max_velocity: 1.0,
        ..BoundsArgs::default()
    };
    assert_eq!(
        inverted.resolve(1).validate(),
        Err(ConfigError::MaxVelocityBelowMin)
    );

    let negative_fixed = BoundsArgs {
        velocity: Some(-3.0),
        ..BoundsArgs::default()
    };
    assert_eq!(
        negative_fixed.resolve(1).validate(),
        Err(ConfigError::VelocityNegative)
    );
}

#[test]
fn test_first_violation_wins() {
    // Both the mass and the position bounds are broken; mass is checked first.
    let args = BoundsArgs {
        min_mass: -1.0,
        max_position: -5.0,
        min_velocity: -1.0,
        ..BoundsArgs::default()
    };
    assert_eq!(
        args.resolve(1).validate(),
        Err(ConfigError::MinMassNotPositive)
    );
}

#[test]
fn test_non_finite_bounds_are_rejected() {
    let args = BoundsArgs {
        max_position: f64::NAN,
        ..BoundsArgs::default()
    };
    assert_eq!(
        args.resolve(1).validate(),
        Err(ConfigError::NonFinite {
            field: "max-position"
        })
    );

    let args = BoundsArgs {
        velocity: Some(f64::INFINITY),
        ..BoundsArgs::default()
    };
    assert_eq!(
        args.resolve(1).validate(),
        Err(ConfigError::NonFinite { field: "velocity" })
    );
}

#[test]
fn test_config_file_fills_missing_fields_with_defaults() {
    let args: BoundsArgs = serde_json::from_str(r#"{ "mass": 5.0, "max_position": 10.0 }"#)
        .expect("parse bounds");
    assert_eq!(args.mass, Some(5.0));
    assert_eq!(args.max_position, 10.0);
    assert_eq!(args.min_position, -1.0);
    assert_eq!(args.max_velocity, 1.0);
}

#[test]
fn test_config_error_messages_name_the_constraint() {
    assert_eq!(
        ConfigError::PositionRangeEmpty.to_string(),
        "max-position must be greater than the min-position"
    );
    assert_eq!(
        ConfigError::MinVelocityNegative.to_string(),
        "min-velocity must be non-negative"
    );
}

#[derive(clap::Parser)]
struct Flags {
    #[command(flatten)]
    bounds: BoundsArgs,
}

#[test]
fn test_fixed_values_skip_overridden_range_checks() {
    use clap::{CommandFactory, Parser};

    let flags = Flags::try_parse_from(["gen", "--mass", "1", "--min-mass", "0"]).unwrap();
    assert_eq!(flags.bounds.resolve(3).validate(), Ok(()));

    let flags =
        Flags::try_parse_from(["gen", "--velocity", "0", "--min-velocity", "-1"]).unwrap();
    let config = flags.bounds.resolve(3);
    assert_eq!(config.velocity, VelocityMode::Zero);
    assert_eq!(config.validate(), Ok(()));

    let help = Flags::command().term_width(0).render_long_help().to_string();
    assert!(help.contains("min-mass and max-mass are ignored and not validated"));
    assert!(help.contains("min-velocity and max-velocity are ignored and not validated"));
}
