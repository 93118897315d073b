//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Acceleration and target speed are finite and positive
/// - Smooth delay is non-zero
/// - Step pulse width is non-zero
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, motor) in config.motors.iter() {
        validate_motor(motor)?;
    }

    Ok(())
}

/// Validate a single motor configuration.
pub fn validate_motor(config: &MotorConfig) -> Result<()> {
    if !(config.acceleration.is_finite() && config.acceleration > 0.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration,
        )));
    }

    if !(config.target_speed.is_finite() && config.target_speed > 0.0) {
        return Err(Error::Config(ConfigError::InvalidTargetSpeed(
            config.target_speed,
        )));
    }

    if config.smooth_delay == 0 {
        return Err(Error::Config(ConfigError::InvalidSmoothDelay(
            config.smooth_delay,
        )));
    }

    if config.timing.step_pulse_us == 0 {
        return Err(Error::Config(ConfigError::InvalidStepPulse(
            config.timing.step_pulse_us,
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_acceleration() {
        let mut config = MotorConfig::new("test", 500);
        config.acceleration = -1.0;

        let result = validate_motor(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidAcceleration(_)))
        ));
    }

    #[test]
    fn test_nan_target_speed() {
        let mut config = MotorConfig::new("test", 500);
        config.target_speed = f32::NAN;

        assert!(matches!(
            validate_motor(&config),
            Err(Error::Config(ConfigError::InvalidTargetSpeed(_)))
        ));
    }

    #[test]
    fn test_zero_smooth_delay() {
        let config = MotorConfig::new("test", 0);

        assert_eq!(
            validate_motor(&config),
            Err(Error::Config(ConfigError::InvalidSmoothDelay(0)))
        );
    }
}
