//! Motion state and direction.

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Towards increasing positions.
    Forward,
    /// Towards decreasing positions.
    Reverse,
}

impl Direction {
    /// Get direction from a signed distance. Zero counts as forward.
    #[inline]
    pub fn from_delta(delta: i32) -> Self {
        if delta >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// State of the velocity profile engine.
///
/// Governs how the delay of the next pulse is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Driver unpowered. Left only through `on()`.
    Off,
    /// Delay shrinking towards the target delay.
    Accel,
    /// Delay growing towards the target delay, or towards a stop.
    Decel,
    /// Cruising at the target delay.
    TargetSpeed,
}
