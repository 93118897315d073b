//! Microsecond clock and wraparound-safe timestamps.
//!
//! The clock is a free-running `u32` counter, so it wraps every ~71 minutes.
//! Comparisons use wrapping subtraction and are only meaningful while the
//! two instants are less than 2^31 us apart.

/// A source of monotonic microseconds.
pub trait MicrosClock {
    /// Current time in microseconds. Expected to wrap at `u32::MAX`.
    fn now_us(&mut self) -> u32;
}

impl<F> MicrosClock for F
where
    F: FnMut() -> u32,
{
    fn now_us(&mut self) -> u32 {
        self()
    }
}

/// Clock backed by the operating system, counting from its creation.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdClock {
    created_at: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self {
            created_at: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl MicrosClock for StdClock {
    fn now_us(&mut self) -> u32 {
        // Truncation is the wraparound of a hardware counter.
        self.created_at.elapsed().as_micros() as u32
    }
}

/// An instant on the microsecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(pub u32);

impl Timestamp {
    /// The instant `us` microseconds after this one.
    #[inline]
    pub fn after(self, us: u32) -> Self {
        Self(self.0.wrapping_add(us))
    }

    /// Raw clock value.
    #[inline]
    pub const fn as_micros(self) -> u32 {
        self.0
    }

    /// Whether `now` is at or past this instant.
    #[inline]
    pub fn is_reached(self, now: u32) -> bool {
        now.wrapping_sub(self.0) < 1 << 31
    }

    /// Microseconds left until this instant, zero once reached.
    #[inline]
    pub fn micros_until(self, now: u32) -> u32 {
        if self.is_reached(now) {
            0
        } else {
            self.0.wrapping_sub(now)
        }
    }
}
