//! Stepper motor step engine.
//!
//! Generic over embedded-hal 1.0 pin types, a microsecond clock and a delay
//! provider. The caller drives the engine: call [`Stepper::step`], wait
//! until the returned timestamp, call again.
//!
//! Profile configuration calls never fail. Those that need the motor at
//! rest (`set_acceleration`, `calibrate_position`, `set_microstep_level`)
//! silently do nothing otherwise; check [`Stepper::is_stopped`] first.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::config::units::{LogicLevel, MicrostepLevel};
use crate::config::{validate_motor, DriverTiming, MotorConfig};
use crate::error::{MotorError, Result};
use crate::motion::ramp::{slow_down, speed_up};
use crate::motion::{AccelerationTable, Direction, MotionState, ScaledDelays};

use super::builder::StepperBuilder;
use super::clock::{MicrosClock, Timestamp};
use super::pins::MicrostepSelect;
use super::position::PositionTracker;

/// Stepper motor step engine.
///
/// Generic over:
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `EN`: ENABLE pin type (must implement `OutputPin`)
/// - `MS`: Microstep mode selection (must implement `MicrostepSelect`)
/// - `CLK`: Microsecond clock (must implement `MicrosClock`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
pub struct Stepper<DIR, STEP, EN, MS, CLK, DELAY>
where
    DIR: OutputPin,
    STEP: OutputPin,
    EN: OutputPin,
    MS: MicrostepSelect,
    CLK: MicrosClock,
    DELAY: DelayNs,
{
    dir_pin: DIR,
    step_pin: STEP,
    enable_pin: EN,
    microstep: MS,
    clock: CLK,
    delay: DELAY,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// DIR pin level that moves forward.
    forward_level: LogicLevel,
    /// ENABLE pin level that powers the driver.
    enable_level: LogicLevel,
    timing: DriverTiming,
    /// Switch microstep level with speed.
    adaptive: bool,

    /// Direction the DIR pin currently selects.
    direction: Direction,
    position: PositionTracker,
    /// Ramp steps taken from the starting delay, in pulses of the current level.
    accel_steps: u32,
    delays: ScaledDelays,
    state: MotionState,
}

impl<DIR, STEP, EN, MS, CLK, DELAY> Stepper<DIR, STEP, EN, MS, CLK, DELAY>
where
    DIR: OutputPin,
    STEP: OutputPin,
    EN: OutputPin,
    MS: MicrostepSelect,
    CLK: MicrosClock,
    DELAY: DelayNs,
{
    /// Start building an engine.
    pub fn builder() -> StepperBuilder<DIR, STEP, EN, MS, CLK, DELAY> {
        StepperBuilder::new()
    }

    /// Create the engine and put the driver in a known state.
    ///
    /// DIR is set forward, the driver is disabled and the configured
    /// microstep level is selected. Then the configured acceleration and
    /// target speed are applied.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `config` does not validate, or
    /// `MotorError::PinError` if a pin cannot be driven.
    pub fn new(
        dir_pin: DIR,
        step_pin: STEP,
        enable_pin: EN,
        microstep: MS,
        clock: CLK,
        delay: DELAY,
        config: &MotorConfig,
    ) -> Result<Self> {
        validate_motor(config)?;

        let level = if config.microsteps.index() < microstep.levels() {
            config.microsteps
        } else {
            warn!(
                "microstep level {} not available, using full steps",
                config.microsteps.value()
            );
            MicrostepLevel::FULL
        };

        let mut stepper = Self {
            dir_pin,
            step_pin,
            enable_pin,
            microstep,
            clock,
            delay,
            name: config.name.clone(),
            forward_level: config.forward_level,
            enable_level: config.enable_level,
            timing: config.timing,
            adaptive: config.adaptive_microstepping,
            direction: Direction::Forward,
            position: PositionTracker::new(level),
            accel_steps: 0,
            delays: ScaledDelays::new(config.smooth_delay),
            state: MotionState::Accel,
        };

        stepper.write_direction(Direction::Forward)?;
        stepper.write_enable(false)?;
        stepper.microstep.select(level)?;
        stepper.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        stepper.set_acceleration(config.acceleration);
        stepper.set_target_speed(config.target_speed);
        info!(
            "stepper ready: start {} us, target {} us",
            stepper.current_delay_us(),
            stepper.target_delay_us()
        );
        Ok(stepper)
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Whether the motor is at its target with no speed left.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.position.is_at_target() && self.accel_steps == 0
    }

    /// Current engine state.
    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Direction currently selected on the DIR pin.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current position in microsteps of the active level.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position.position()
    }

    /// Current position in full steps.
    #[inline]
    pub fn position_full_steps(&self) -> i32 {
        self.position.position_full_steps()
    }

    /// Target position in microsteps of the active level.
    #[inline]
    pub fn target_position(&self) -> i32 {
        self.position.target()
    }

    /// Target position in full steps.
    #[inline]
    pub fn target_full_steps(&self) -> i32 {
        self.position.target_full_steps()
    }

    /// Active microstep level.
    #[inline]
    pub fn microstep_level(&self) -> MicrostepLevel {
        self.position.level()
    }

    /// Ramp steps taken from the starting delay.
    #[inline]
    pub fn accel_steps(&self) -> u32 {
        self.accel_steps
    }

    /// Current full-step delay in microseconds.
    #[inline]
    pub fn current_delay_us(&self) -> u32 {
        self.delays.to_micros(self.delays.current())
    }

    /// Full-step delay at the commanded speed, in microseconds.
    #[inline]
    pub fn target_delay_us(&self) -> u32 {
        self.delays.to_micros(self.delays.target())
    }

    /// Full-step delay of the first step from rest at `level`, in microseconds.
    #[inline]
    pub fn starting_delay_us(&self, level: MicrostepLevel) -> u32 {
        self.delays.to_micros(self.delays.start(level))
    }

    /// Interval between pulses at the current delay and level, in microseconds.
    #[inline]
    pub fn pulse_interval_us(&self) -> u32 {
        self.current_delay_us() >> self.position.level().value()
    }

    /// Shift currently applied to all delays.
    #[inline]
    pub fn shift(&self) -> u8 {
        self.delays.shift()
    }

    /// Set the current position, in full steps. Requires stopped state.
    ///
    /// The target is left alone, so a later `step()` moves back to it.
    pub fn calibrate_position(&mut self, full_steps: i32) {
        if !self.is_stopped() {
            debug!("calibration ignored: motor not stopped");
            return;
        }

        let position = &mut self.position;
        self.delays.unscaled(|_| position.calibrate(full_steps));
    }

    /// Power the driver.
    ///
    /// Stepping before the driver is powered loses track of position and
    /// speed.
    ///
    /// Returns the timestamp at which the driver is ready.
    pub fn on(&mut self) -> Result<Timestamp> {
        let now = self.clock.now_us();
        self.write_enable(true)?;
        self.state = MotionState::Accel;
        debug!("driver enabled");
        Ok(Timestamp(now).after(self.timing.enable_wait()))
    }

    /// Cut power to the driver.
    ///
    /// The ramp restarts from rest on the next move. Doing this while the
    /// motor is moving loses track of its position.
    ///
    /// Returns the timestamp at which the driver is off.
    pub fn off(&mut self) -> Result<Timestamp> {
        let now = self.clock.now_us();
        self.write_enable(false)?;
        self.accel_steps = 0;
        self.delays.current = self.delays.start(self.position.level());
        self.state = MotionState::Off;
        debug!("driver disabled");
        Ok(Timestamp(now).after(self.timing.enable_wait()))
    }

    /// Set acceleration (and deceleration) in full steps/s². Requires stopped
    /// state.
    pub fn set_acceleration(&mut self, accel: f32) {
        if !self.is_stopped() {
            debug!("acceleration change ignored: motor not stopped");
            return;
        }
        if !(accel.is_finite() && accel > 0.0) {
            debug!("acceleration change ignored: {} is not positive", accel);
            return;
        }

        let level = self.position.level();
        self.delays.unscaled(|delays| {
            delays.set_table(AccelerationTable::from_acceleration(accel));
            delays.current = delays.start(level);
        });
    }

    /// Set the target position in full steps. Can be called at any time.
    pub fn set_target_position(&mut self, full_steps: i32) {
        self.position.set_target(full_steps);
    }

    /// Set the cruise speed in full steps/s. Can be called at any time.
    ///
    /// While running, a slower speed makes the motor decelerate to it and a
    /// faster one makes it accelerate.
    pub fn set_target_speed(&mut self, speed: f32) {
        if !(speed.is_finite() && speed > 0.0) {
            debug!("speed change ignored: {} is not positive", speed);
            return;
        }

        let running = !self.is_stopped() && self.state != MotionState::Off;
        let state = &mut self.state;
        self.delays.unscaled(|delays| {
            delays.target = ((1e6 / speed) as u32).max(1);

            if running {
                *state = if delays.target > delays.current {
                    MotionState::Decel
                } else {
                    MotionState::Accel
                };
            }
        });
    }

    /// Select a microstep level. Requires stopped state.
    ///
    /// Coarser levels are refused while the position is not on their grid.
    pub fn set_microstep_level(&mut self, level: MicrostepLevel) -> Result<()> {
        if !self.is_stopped() || level.index() >= self.microstep.levels() {
            debug!("microstep change ignored");
            return Ok(());
        }
        if !self.position.change_level(level) {
            return Ok(());
        }

        self.microstep.select(level)?;
        self.delays.current = self.delays.start(level);
        Ok(())
    }

    /// Take one step towards the target position.
    ///
    /// Returns the timestamp at which `step()` must be called again, or
    /// `None` once the motor has arrived and is at rest (or is off). Do not
    /// call again before the returned timestamp.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if a pin cannot be driven.
    pub fn step(&mut self) -> Result<Option<Timestamp>> {
        if self.state == MotionState::Off {
            return Ok(None);
        }
        if self.is_stopped() {
            return Ok(None);
        }

        let now = Timestamp(self.clock.now_us());
        let remaining = self.position.remaining();

        // Reverse only from rest. At speed the ramp below decelerates first.
        if self.accel_steps == 0 && remaining != 0 {
            let wanted = Direction::from_delta(remaining);
            if wanted != self.direction {
                trace!("direction change to {:?}", wanted);
                self.write_direction(wanted)?;
                return Ok(Some(now.after(self.timing.mode_change_wait())));
            }
        }

        let distance = remaining.saturating_mul(self.direction.sign());
        self.advance_ramp(distance);

        self.pulse()?;
        self.position.advance(self.direction);

        let switched = self.adapt_microstep()?;

        let mut wait = self.pulse_interval_us().max(self.timing.min_pulse_interval());
        if switched {
            wait = wait.max(self.timing.mode_change_wait());
        }

        if self.is_stopped() {
            debug!("arrived at {}", self.position.position_full_steps());
        }
        Ok(Some(now.after(wait)))
    }

    /// Step until the target is reached, waiting between pulses with the
    /// delay provider.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if a pin cannot be driven.
    pub fn run_until_arrived(&mut self) -> Result<()> {
        while let Some(next) = self.step()? {
            self.wait_until(next);
        }
        Ok(())
    }

    /// Block until `instant` with the delay provider.
    pub fn wait_until(&mut self, instant: Timestamp) {
        let remaining = instant.micros_until(self.clock.now_us());
        if remaining > 0 {
            self.delay.delay_us(remaining);
        }
    }

    /// Compute the delay following this pulse.
    ///
    /// `distance` is the number of microsteps left along the current
    /// direction, this pulse included. Zero or negative means the target is
    /// behind and the motor has to stop first.
    fn advance_ramp(&mut self, distance: i32) {
        let level = self.position.level();
        let start = self.delays.start(level);
        let target = self.delays.target;
        let steps = self.accel_steps;

        if steps == 0 {
            if target >= start {
                // Slower than the first ramp step: no ramp needed.
                self.delays.current = target;
                self.state = MotionState::TargetSpeed;
            } else if distance <= 1 {
                self.delays.current = start;
                self.state = MotionState::Decel;
            } else {
                self.delays.current = start;
                self.accel_steps = 1;
                self.state = MotionState::Accel;
            }
            return;
        }

        // Stopping takes as many pulses as the ramp has steps.
        if distance <= steps as i32 {
            let (delay, steps) = slow_down(self.delays.current, steps, start);
            self.delays.current = delay;
            self.accel_steps = steps;
            self.state = MotionState::Decel;
            return;
        }

        let current = self.delays.current;
        if current > target {
            if distance == steps as i32 + 1 {
                // One more step of speed would overshoot the stopping point.
                return;
            }
            let (delay, steps) = speed_up(current, steps);
            self.accel_steps = steps;
            if delay <= target {
                self.delays.current = target;
                self.state = MotionState::TargetSpeed;
            } else {
                self.delays.current = delay;
                self.state = MotionState::Accel;
            }
        } else if current < target {
            let (delay, steps) = slow_down(current, steps, start);
            self.accel_steps = steps;
            if steps == 0 {
                // Back at rest speed; `delay` is the starting delay here.
                self.delays.current = target.max(delay);
                self.state = MotionState::TargetSpeed;
            } else if delay >= target {
                self.delays.current = target;
                self.state = MotionState::TargetSpeed;
            } else {
                self.delays.current = delay;
                self.state = MotionState::Decel;
            }
        } else {
            self.state = MotionState::TargetSpeed;
        }
    }

    /// Keep the pulse interval between the smooth delay and twice it.
    ///
    /// Returns whether the level changed.
    fn adapt_microstep(&mut self) -> Result<bool> {
        if !self.adaptive {
            return Ok(false);
        }

        let level = self.position.level();
        let pulse = self.delays.current >> level.value();
        let smooth = self.delays.smooth;

        let next = if pulse >> 1 >= smooth {
            level.finer().filter(|l| l.index() < self.microstep.levels())
        } else if pulse < smooth {
            // Every level below a selectable one is selectable too.
            level.coarser()
        } else {
            None
        };

        let Some(next) = next else {
            return Ok(false);
        };
        if !self.position.change_level(next) {
            return Ok(false);
        }

        self.accel_steps = if next > level {
            self.accel_steps.saturating_mul(2)
        } else if self.accel_steps > 0 {
            (self.accel_steps / 2).max(1)
        } else {
            0
        };
        self.microstep.select(next)?;
        trace!("microstep level {} -> {}", level.value(), next.value());
        Ok(true)
    }

    fn pulse(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.timing.step_pulse_us);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    fn write_direction(&mut self, direction: Direction) -> Result<()> {
        let level = match direction {
            Direction::Forward => self.forward_level,
            Direction::Reverse => !self.forward_level,
        };
        self.dir_pin
            .set_state(PinState::from(level))
            .map_err(|_| MotorError::PinError)?;
        self.direction = direction;
        Ok(())
    }

    fn write_enable(&mut self, enabled: bool) -> Result<()> {
        let level = if enabled {
            self.enable_level
        } else {
            !self.enable_level
        };
        self.enable_pin
            .set_state(PinState::from(level))
            .map_err(|_| MotorError::PinError)?;
        Ok(())
    }
}
