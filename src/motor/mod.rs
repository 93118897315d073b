//! Motor module for stepper-ramp.
//!
//! Provides the step engine, its builder and the hardware seams it drives:
//! mode pins, a microsecond clock and position bookkeeping.

mod builder;
mod clock;
mod driver;
mod pins;
mod position;

pub use builder::StepperBuilder;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{MicrosClock, Timestamp};
pub use driver::Stepper;
pub use pins::{FixedMicrostep, MicrostepPins, MicrostepSelect};
pub use position::PositionTracker;
