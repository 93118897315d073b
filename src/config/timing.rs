//! Driver timing constraints.

use serde::Deserialize;

/// Minimum delays required by the driver electronics, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverTiming {
    /// Time needed for the driver to become enabled or disabled.
    #[serde(default = "default_us")]
    pub enable_settle_us: u32,

    /// Time needed after changing direction or microstep mode.
    #[serde(default = "default_us")]
    pub mode_change_us: u32,

    /// Minimum STEP pulse width.
    #[serde(default = "default_us")]
    pub step_pulse_us: u32,
}

fn default_us() -> u32 {
    1
}

impl Default for DriverTiming {
    fn default() -> Self {
        Self {
            enable_settle_us: default_us(),
            mode_change_us: default_us(),
            step_pulse_us: default_us(),
        }
    }
}

impl DriverTiming {
    /// Wait after an enable transition.
    ///
    /// One extra microsecond covers the fraction already elapsed in the
    /// current clock tick.
    #[inline]
    pub(crate) fn enable_wait(&self) -> u32 {
        self.enable_settle_us.saturating_add(1)
    }

    /// Wait after a direction or microstep mode change.
    #[inline]
    pub(crate) fn mode_change_wait(&self) -> u32 {
        self.mode_change_us.saturating_add(1)
    }

    /// Shortest pulse-to-pulse interval: the high and the low phase both
    /// need the minimum pulse width.
    #[inline]
    pub(crate) fn min_pulse_interval(&self) -> u32 {
        self.step_pulse_us.saturating_mul(2).max(1)
    }
}
