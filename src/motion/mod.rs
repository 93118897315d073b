//! Motion module for stepper-ramp.
//!
//! Provides the delay tables, precision scaling and ramp arithmetic behind
//! the step engine.

pub mod ramp;
pub mod scaler;
mod state;
mod table;

pub use scaler::{ScaledDelays, SHIFT_THRESHOLD};
pub use state::{Direction, MotionState};
pub use table::AccelerationTable;
