//! # stepper-ramp
//!
//! Trapezoidal velocity profiles for STEP/DIR stepper drivers, with
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Integer ramp**: Per-step delays from a fixed-point acceleration recurrence
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR/ENABLE, `DelayNs` for pulse widths
//! - **no_std compatible**: Core library works without standard library
//! - **Adaptive microstepping**: Microstep level follows speed to keep pulses smooth
//! - **Position tracking**: Absolute position kept across level changes
//! - **Non-blocking**: `step()` returns when to call it again
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_ramp::{Stepper, SystemConfig};
//!
//! // Load configuration from TOML
//! let config: SystemConfig = stepper_ramp::load_config("motion.toml")?;
//!
//! // Create the engine with embedded-hal pins
//! let mut motor = Stepper::builder()
//!     .from_config(&config, "x_axis")?
//!     .dir_pin(dir_pin)
//!     .step_pin(step_pin)
//!     .enable_pin(enable_pin)
//!     .microstep(MicrostepPins::new(m0, m1, m2))
//!     .clock(clock)
//!     .delay(delay)
//!     .build()?;
//!
//! motor.on()?;
//! motor.set_target_position(2_000);
//! while let Some(next) = motor.step()? {
//!     // do other work until `next`
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `StdClock`
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, MotorConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionState};
pub use motor::{
    FixedMicrostep, MicrosClock, MicrostepPins, MicrostepSelect, Stepper, StepperBuilder, Timestamp,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use motor::StdClock;

// Unit types
pub use config::units::{LogicLevel, MicrostepLevel};
