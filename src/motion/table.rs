//! Per-level starting delays derived from the acceleration.

use libm::sqrtf;

use crate::config::units::{MicrostepLevel, MICRO_LEVELS};

/// Correction factor for the first step of a linear ramp.
///
/// Exact value matters: the whole ramp inherits it.
const FIRST_STEP_FACTOR: f32 = 0.676;

/// Starting delay (delay of the first step from rest) for every microstep level.
///
/// Delays are full-step equivalent: the time a full step would take at the
/// rate of the first pulse. The pulse interval at level `m` is `delay0[m] >> m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccelerationTable {
    delay0: [u32; MICRO_LEVELS],
}

impl AccelerationTable {
    /// Build the table for an acceleration in full steps per second squared.
    ///
    /// `delay0[m] = floor(d0 * sqrt(2^m))` with `d0 = sqrt(1/accel) * 0.676e6`.
    pub fn from_acceleration(accel: f32) -> Self {
        let d0 = sqrtf(1.0 / accel) * FIRST_STEP_FACTOR * 1e6;
        let mut delay0 = [0; MICRO_LEVELS];
        for (m, slot) in delay0.iter_mut().enumerate() {
            *slot = (d0 * sqrtf((1u32 << m) as f32)) as u32;
        }
        Self { delay0 }
    }

    /// Starting delay at a level.
    #[inline]
    pub fn get(&self, level: MicrostepLevel) -> u32 {
        self.delay0[level.index()]
    }

    /// Largest starting delay (finest level).
    #[inline]
    pub fn max(&self) -> u32 {
        self.delay0.iter().copied().max().unwrap_or(0)
    }

    /// Iterate over the delays, coarsest level first.
    pub fn iter(&self) -> impl Iterator<Item = &u32> {
        self.delay0.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut u32> {
        self.delay0.iter_mut()
    }
}
