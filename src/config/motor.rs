//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::timing::DriverTiming;
use super::units::{LogicLevel, MicrostepLevel};

/// Acceleration applied at construction, in full steps/s².
pub const DEFAULT_ACCELERATION: f32 = 10.0;

/// Target speed applied at construction, in full steps/s.
pub const DEFAULT_TARGET_SPEED: f32 = 10.0;

/// Complete stepper driver configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Pulse interval at which the motor runs smoothly, in microseconds.
    ///
    /// The microstep level is switched to keep the pulse interval between
    /// this value and twice this value.
    #[serde(rename = "smooth_delay_us")]
    pub smooth_delay: u32,

    /// Level on the DIR pin that moves the motor forward.
    #[serde(default = "default_forward_level")]
    pub forward_level: LogicLevel,

    /// Level on the ENABLE pin that powers the driver.
    #[serde(default = "default_enable_level")]
    pub enable_level: LogicLevel,

    /// Acceleration (and deceleration) in full steps per second squared.
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,

    /// Cruise speed in full steps per second.
    #[serde(default = "default_target_speed")]
    pub target_speed: f32,

    /// Microstep setting selected at construction (1, 2, 4, 8, 16, 32).
    #[serde(default)]
    pub microsteps: MicrostepLevel,

    /// Let the engine switch microstep level with speed.
    #[serde(default = "default_adaptive")]
    pub adaptive_microstepping: bool,

    /// Driver timing constraints.
    #[serde(default)]
    pub timing: DriverTiming,
}

fn default_forward_level() -> LogicLevel {
    LogicLevel::High
}

fn default_enable_level() -> LogicLevel {
    LogicLevel::Low
}

fn default_acceleration() -> f32 {
    DEFAULT_ACCELERATION
}

fn default_target_speed() -> f32 {
    DEFAULT_TARGET_SPEED
}

fn default_adaptive() -> bool {
    true
}

impl MotorConfig {
    /// Create a configuration with defaults for everything but the smooth delay.
    pub fn new(name: &str, smooth_delay: u32) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            smooth_delay,
            forward_level: default_forward_level(),
            enable_level: default_enable_level(),
            acceleration: DEFAULT_ACCELERATION,
            target_speed: DEFAULT_TARGET_SPEED,
            microsteps: MicrostepLevel::FULL,
            adaptive_microstepping: true,
            timing: DriverTiming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MotorConfig::new("test", 500);

        assert_eq!(config.name.as_str(), "test");
        assert_eq!(config.forward_level, LogicLevel::High);
        assert_eq!(config.enable_level, LogicLevel::Low);
        assert_eq!(config.acceleration, 10.0);
        assert_eq!(config.target_speed, 10.0);
        assert_eq!(config.microsteps, MicrostepLevel::FULL);
        assert!(config.adaptive_microstepping);
        assert_eq!(config.timing, DriverTiming::default());
    }
}
