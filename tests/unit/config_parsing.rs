//! Unit tests for TOML configuration parsing.

use stepper_ramp::config::{load_config, parse_config, SystemConfig};
use stepper_ramp::error::{ConfigError, Error};
use stepper_ramp::{LogicLevel, MicrostepLevel};

/// Test parsing a valid driver configuration from TOML.
#[test]
fn test_parse_motor_config() {
    let toml_str = r#"
[motors.stepper1]
name = "main_axis"
smooth_delay_us = 250
acceleration = 800.0
target_speed = 1200.0
microsteps = 16
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let motor = config.motor("stepper1").expect("Motor not found");

    assert_eq!(motor.name.as_str(), "main_axis");
    assert_eq!(motor.smooth_delay, 250);
    assert_eq!(motor.acceleration, 800.0);
    assert_eq!(motor.target_speed, 1200.0);
    assert_eq!(motor.microsteps.microsteps(), 16);
    assert_eq!(motor.microsteps.value(), 4);
    assert_eq!(motor.forward_level, LogicLevel::High);
    assert_eq!(motor.enable_level, LogicLevel::Low);
    assert!(motor.adaptive_microstepping);
}

/// Test that several drivers keep their names and order.
#[test]
fn test_parse_multiple_motors() {
    let toml_str = r#"
[motors.x]
name = "X"
smooth_delay_us = 300

[motors.y]
name = "Y"
smooth_delay_us = 350
enable_level = "high"
"#;

    let config = parse_config(toml_str).expect("Failed to parse");
    let names: Vec<&str> = config.motor_names().collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(config.motor("y").unwrap().enable_level, LogicLevel::High);
    assert!(config.motor("z").is_none());
}

/// Test that a non power-of-two microstep divisor is rejected.
#[test]
fn test_parse_rejects_bad_microsteps() {
    let toml_str = r#"
[motors.stepper1]
name = "main_axis"
smooth_delay_us = 250
microsteps = 3
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test that the smooth delay is required.
#[test]
fn test_parse_requires_smooth_delay() {
    let toml_str = r#"
[motors.stepper1]
name = "main_axis"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("stepper_ramp_load_test.toml");
    std::fs::write(
        &path,
        "[motors.a]\nname = \"A\"\nsmooth_delay_us = 100\nmicrosteps = 32\n",
    )
    .expect("Failed to write temp file");

    let config = load_config(&path).expect("Failed to load");
    let motor = config.motor("a").unwrap();
    assert_eq!(motor.microsteps, MicrostepLevel::FINEST);

    let _ = std::fs::remove_file(&path);
}

/// Test that a missing file reports an I/O error.
#[test]
fn test_load_missing_file() {
    assert!(matches!(
        load_config("/nonexistent/stepper_ramp.toml"),
        Err(Error::Config(ConfigError::IoError(_)))
    ));
}
