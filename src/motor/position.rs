//! Position tracking for stepper motors.
//!
//! Positions are kept in microsteps of the active level and rescaled when
//! the level changes. The public API speaks full steps.

use crate::config::units::MicrostepLevel;
use crate::motion::Direction;

/// Absolute and target position in microsteps of the active level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionTracker {
    /// Current position in microsteps.
    position: i32,
    /// Position being moved to, in microsteps.
    target: i32,
    /// Level both values are expressed in.
    level: MicrostepLevel,
}

impl PositionTracker {
    /// Create a tracker at the origin.
    #[inline]
    pub fn new(level: MicrostepLevel) -> Self {
        Self {
            position: 0,
            target: 0,
            level,
        }
    }

    /// Current position in microsteps.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Target position in microsteps.
    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    /// Active microstep level.
    #[inline]
    pub fn level(&self) -> MicrostepLevel {
        self.level
    }

    /// Current position in full steps, rounded towards negative infinity.
    #[inline]
    pub fn position_full_steps(&self) -> i32 {
        self.position >> self.level.value()
    }

    /// Target position in full steps.
    #[inline]
    pub fn target_full_steps(&self) -> i32 {
        self.target >> self.level.value()
    }

    /// Set the target from full steps.
    #[inline]
    pub fn set_target(&mut self, full_steps: i32) {
        self.target = full_steps << self.level.value();
    }

    /// Set the current position from full steps.
    #[inline]
    pub fn calibrate(&mut self, full_steps: i32) {
        self.position = full_steps << self.level.value();
    }

    /// Signed microsteps left to the target.
    #[inline]
    pub fn remaining(&self) -> i32 {
        self.target.wrapping_sub(self.position)
    }

    /// Whether the position equals the target.
    #[inline]
    pub fn is_at_target(&self) -> bool {
        self.position == self.target
    }

    /// Account for one microstep taken in `direction`.
    #[inline]
    pub fn advance(&mut self, direction: Direction) {
        self.position = self.position.wrapping_add(direction.sign());
    }

    /// Express both positions in another level.
    ///
    /// Going coarser is refused (returns `false`) unless both positions lie
    /// on the coarser grid; the driver would otherwise snap to it and lose
    /// track.
    pub fn change_level(&mut self, level: MicrostepLevel) -> bool {
        if level > self.level {
            let diff = level.value() - self.level.value();
            self.position <<= diff;
            self.target <<= diff;
        } else if level < self.level {
            let diff = self.level.value() - level.value();
            let mask = (1i32 << diff) - 1;
            if self.position & mask != 0 || self.target & mask != 0 {
                return false;
            }
            self.position >>= diff;
            self.target >>= diff;
        }
        self.level = level;
        true
    }
}
