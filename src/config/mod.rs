//! Configuration module for stepper-ramp.
//!
//! Provides types for loading and validating stepper driver configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod motor;
mod system;
mod timing;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motor::{MotorConfig, DEFAULT_ACCELERATION, DEFAULT_TARGET_SPEED};
pub use system::SystemConfig;
pub use timing::DriverTiming;
pub use validation::{validate_config, validate_motor};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{LogicLevel, MicrostepLevel, MICRO_LEVELS};
