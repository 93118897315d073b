//! Precision scaling of delay values.
//!
//! Delays range from a few microseconds to several hundred thousand. The
//! ramp recurrence divides them by growing step counts, so small values lose
//! most of their significant bits. All delay-valued fields therefore share a
//! binary shift that pushes the largest of them just under `SHIFT_THRESHOLD`.
//!
//! Fields are only recomputed from physical units inside [`ScaledDelays::unscaled`],
//! which normalizes before and rescales after.

use crate::config::units::MicrostepLevel;

use super::table::AccelerationTable;

/// Scaled values stay below this after a rescale doubled them once more.
pub const SHIFT_THRESHOLD: u32 = 1 << 30;

/// Every delay-valued field of the engine, sharing one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledDelays {
    /// Starting delay per microstep level.
    start: AccelerationTable,
    /// Current full-step equivalent delay.
    pub(crate) current: u32,
    /// Delay at the commanded speed.
    pub(crate) target: u32,
    /// Ideal pulse interval.
    pub(crate) smooth: u32,
    shift: u8,
}

impl ScaledDelays {
    /// Create an unscaled set holding only the smooth delay.
    pub fn new(smooth_delay: u32) -> Self {
        Self {
            start: AccelerationTable::default(),
            current: 0,
            target: 0,
            smooth: smooth_delay,
            shift: 0,
        }
    }

    /// Current shift exponent.
    #[inline]
    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// Scaled starting delay at a level.
    #[inline]
    pub fn start(&self, level: MicrostepLevel) -> u32 {
        self.start.get(level)
    }

    /// Scaled current delay.
    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Scaled target delay.
    #[inline]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Scaled smooth delay.
    #[inline]
    pub fn smooth(&self) -> u32 {
        self.smooth
    }

    /// Convert a scaled value back to microseconds.
    #[inline]
    pub fn to_micros(&self, scaled: u32) -> u32 {
        scaled >> self.shift
    }

    /// Replace the starting delays. Only valid while unscaled.
    pub(crate) fn set_table(&mut self, table: AccelerationTable) {
        debug_assert_eq!(self.shift, 0);
        self.start = table;
    }

    /// Shift every field back to true microseconds and clear the shift.
    pub fn normalize(&mut self) {
        let shift = self.shift;
        self.for_each_field(|v| *v >>= shift);
        self.shift = 0;
    }

    /// Scale every field up so the largest sits just under the threshold.
    ///
    /// Does nothing while a shift is already applied.
    pub fn rescale(&mut self) {
        if self.shift != 0 {
            return;
        }

        // `current` can exceed every other field after a speed-up from a
        // slow cruise, so it bounds the shift too.
        let mut max_delay = self
            .start
            .max()
            .max(self.target)
            .max(self.smooth)
            .max(self.current);
        if max_delay == 0 {
            return;
        }

        let mut shift = 0u8;
        while max_delay < SHIFT_THRESHOLD {
            shift += 1;
            max_delay <<= 1;
        }

        self.for_each_field(|v| *v <<= shift);
        self.shift = shift;
        trace!("delay shift {}", shift);
    }

    /// Run `f` on true microsecond values, then scale again.
    pub fn unscaled<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.normalize();
        let result = f(self);
        self.rescale();
        result
    }

    fn for_each_field(&mut self, mut f: impl FnMut(&mut u32)) {
        for delay in self.start.iter_mut() {
            f(delay);
        }
        f(&mut self.current);
        f(&mut self.target);
        f(&mut self.smooth);
    }
}
