//! Unit tests for configuration validation.

use stepper_ramp::config::{validate_config, validate_motor, MotorConfig, SystemConfig};
use stepper_ramp::error::{ConfigError, Error};

fn parse(toml_str: &str) -> SystemConfig {
    toml::from_str(toml_str).expect("Failed to parse TOML")
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = parse(
        r#"
[motors.stepper1]
name = "main_axis"
smooth_delay_us = 250
acceleration = 800.0
target_speed = 1200.0
"#,
    );
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a zero smooth delay.
#[test]
fn test_zero_smooth_delay() {
    let config = parse(
        r#"
[motors.stepper1]
name = "main_axis"
smooth_delay_us = 0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSmoothDelay(0)))
    ));
}

/// Test validation fails for a negative acceleration.
#[test]
fn test_negative_acceleration() {
    let config = parse(
        r#"
[motors.stepper1]
name = "main_axis"
smooth_delay_us = 250
acceleration = -5.0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Test validation fails for a zero step pulse width.
#[test]
fn test_zero_step_pulse() {
    let config = parse(
        r#"
[motors.stepper1]
name = "main_axis"
smooth_delay_us = 250

[motors.stepper1.timing]
step_pulse_us = 0
"#,
    );
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepPulse(0)))
    ));
}

/// Test that non-finite speeds are rejected.
#[test]
fn test_infinite_target_speed() {
    let mut motor = MotorConfig::new("m", 250);
    motor.target_speed = f32::INFINITY;
    assert!(matches!(
        validate_motor(&motor),
        Err(Error::Config(ConfigError::InvalidTargetSpeed(_)))
    ));
}

/// Test that an empty system is valid.
#[test]
fn test_empty_system_is_valid() {
    assert!(validate_config(&SystemConfig::default()).is_ok());
}
