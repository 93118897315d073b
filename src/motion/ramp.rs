//! Linear acceleration ramp in integer arithmetic.
//!
//! Uses the step recurrence from "Generate stepper-motor speed profiles in
//! real time" (D. Austin): the delay of step `n` shrinks by
//! `2 * delay / (4n + 1)`. With the first delay corrected by 0.676 this tracks
//! `delay0 * (sqrt(n + 1) - sqrt(n))` closely and needs one division per step.
//!
//! Delays are scaled values (see [`super::scaler`]); the recurrence only
//! multiplies by ratios, so the shift does not change the result.

/// Delay after taking one more acceleration step.
///
/// `steps` is the number of ramp steps already taken and must be at least 1.
/// Returns the new delay and step count.
#[inline]
pub fn speed_up(delay: u32, steps: u32) -> (u32, u32) {
    let denom = steps.saturating_mul(4).saturating_add(1);
    (delay.saturating_sub(ratio(delay, denom)), steps.saturating_add(1))
}

/// Delay after giving back one acceleration step.
///
/// Dropping to zero steps lands exactly on `start`, the starting delay.
/// Returns the new delay and step count.
#[inline]
pub fn slow_down(delay: u32, steps: u32, start: u32) -> (u32, u32) {
    let steps = steps.saturating_sub(1);
    if steps == 0 {
        return (start, 0);
    }
    let denom = steps.saturating_mul(4) - 1;
    (delay.saturating_add(ratio(delay, denom)), steps)
}

/// `2 * delay / denom`, rounded to nearest. Scaled delays use the full
/// 32 bits, so the doubling is done in 64.
#[inline]
fn ratio(delay: u32, denom: u32) -> u32 {
    let denom = u64::from(denom);
    u32::try_from((u64::from(delay) * 2 + denom / 2) / denom).unwrap_or(u32::MAX)
}
