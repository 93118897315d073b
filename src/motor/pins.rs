//! Microstep mode selection.

use embedded_hal::digital::{OutputPin, PinState};

use crate::config::units::{MicrostepLevel, MICRO_LEVELS};
use crate::error::MotorError;

/// Drives the microstep mode inputs of a stepper driver.
pub trait MicrostepSelect {
    /// Number of levels the hardware can select, starting at full step.
    fn levels(&self) -> usize;

    /// Put the driver in `level`.
    fn select(&mut self, level: MicrostepLevel) -> Result<(), MotorError>;
}

/// Three mode pins carrying the level in binary (DRV8825 style mode table).
///
/// `M0` is the least significant bit: level 3 (1/8 step) drives M0 and M1
/// high and M2 low.
pub struct MicrostepPins<M0, M1, M2>
where
    M0: OutputPin,
    M1: OutputPin,
    M2: OutputPin,
{
    m0: M0,
    m1: M1,
    m2: M2,
}

impl<M0, M1, M2> MicrostepPins<M0, M1, M2>
where
    M0: OutputPin,
    M1: OutputPin,
    M2: OutputPin,
{
    /// Wrap the three mode pins.
    pub fn new(m0: M0, m1: M1, m2: M2) -> Self {
        Self { m0, m1, m2 }
    }
}

impl<M0, M1, M2> MicrostepSelect for MicrostepPins<M0, M1, M2>
where
    M0: OutputPin,
    M1: OutputPin,
    M2: OutputPin,
{
    fn levels(&self) -> usize {
        MICRO_LEVELS
    }

    fn select(&mut self, level: MicrostepLevel) -> Result<(), MotorError> {
        let bits = level.value();
        let bit = |n: u8| PinState::from(bits & (1 << n) != 0);

        self.m0.set_state(bit(0)).map_err(|_| MotorError::PinError)?;
        self.m1.set_state(bit(1)).map_err(|_| MotorError::PinError)?;
        self.m2.set_state(bit(2)).map_err(|_| MotorError::PinError)?;
        Ok(())
    }
}

/// A driver hard-wired to full steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMicrostep;

impl MicrostepSelect for FixedMicrostep {
    fn levels(&self) -> usize {
        1
    }

    fn select(&mut self, _level: MicrostepLevel) -> Result<(), MotorError> {
        Ok(())
    }
}
