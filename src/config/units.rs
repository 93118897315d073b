//! Unit types for driver configuration.
//!
//! Provides type-safe representations of microstep levels and pin logic
//! levels so that raw integers and booleans do not leak into the engine.

use core::ops::Not;

use embedded_hal::digital::PinState;
use serde::Deserialize;

use crate::error::ConfigError;

/// Number of microstep levels including level 0 (one microstep per step).
///
/// A driver able to do 1/32 stepping has 6 levels.
pub const MICRO_LEVELS: usize = 6;

/// Microstep resolution level.
///
/// Level `m` means `2^m` microsteps per full step. Validated at construction
/// to lie in `[0, MICRO_LEVELS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MicrostepLevel(u8);

impl MicrostepLevel {
    /// Full step (no microstepping).
    pub const FULL: Self = Self(0);
    /// Finest level supported.
    pub const FINEST: Self = Self(MICRO_LEVELS as u8 - 1);

    /// Create a new level with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` if the level is out of range.
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if (level as usize) < MICRO_LEVELS {
            Ok(Self(level))
        } else {
            Err(ConfigError::InvalidMicrosteps(1u16 << level.min(15)))
        }
    }

    /// Create a level from a microstep divisor (1, 2, 4, 8, 16, 32).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` if the divisor is not a
    /// supported power of 2.
    pub fn from_microsteps(microsteps: u16) -> Result<Self, ConfigError> {
        if microsteps.is_power_of_two() && (microsteps.trailing_zeros() as usize) < MICRO_LEVELS {
            Ok(Self(microsteps.trailing_zeros() as u8))
        } else {
            Err(ConfigError::InvalidMicrosteps(microsteps))
        }
    }

    /// Get the raw level.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Get the level as a table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Microsteps per full step at this level.
    #[inline]
    pub const fn microsteps(self) -> u16 {
        1 << self.0
    }

    /// Next finer level, if any.
    #[inline]
    pub fn finer(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// Next coarser level, if any.
    #[inline]
    pub fn coarser(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

impl TryFrom<u8> for MicrostepLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for MicrostepLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        MicrostepLevel::from_microsteps(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

/// Logic level of a driver input, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum LogicLevel {
    /// Pin driven low.
    Low,
    /// Pin driven high.
    High,
}

impl Not for LogicLevel {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            LogicLevel::Low => LogicLevel::High,
            LogicLevel::High => LogicLevel::Low,
        }
    }
}

impl From<LogicLevel> for PinState {
    fn from(level: LogicLevel) -> Self {
        match level {
            LogicLevel::Low => PinState::Low,
            LogicLevel::High => PinState::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microsteps_valid_values() {
        for (level, divisor) in [1u16, 2, 4, 8, 16, 32].into_iter().enumerate() {
            let parsed = MicrostepLevel::from_microsteps(divisor).unwrap();
            assert_eq!(parsed.index(), level);
            assert_eq!(parsed.microsteps(), divisor);
        }
    }

    #[test]
    fn test_microsteps_invalid_values() {
        assert!(MicrostepLevel::from_microsteps(0).is_err());
        assert!(MicrostepLevel::from_microsteps(3).is_err());
        assert!(MicrostepLevel::from_microsteps(64).is_err());
        assert!(MicrostepLevel::new(MICRO_LEVELS as u8).is_err());
    }

    #[test]
    fn test_level_neighbours() {
        assert_eq!(MicrostepLevel::FULL.coarser(), None);
        assert_eq!(MicrostepLevel::FINEST.finer(), None);
        assert_eq!(MicrostepLevel::FULL.finer(), Some(MicrostepLevel(1)));
    }

    #[test]
    fn test_logic_level_inversion() {
        assert_eq!(!LogicLevel::Low, LogicLevel::High);
        assert_eq!(PinState::from(!LogicLevel::High), PinState::Low);
    }
}
