//! Builder pattern for Stepper.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{LogicLevel, MicrostepLevel};
use crate::config::{DriverTiming, MotorConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::clock::MicrosClock;
use super::driver::Stepper;
use super::pins::MicrostepSelect;

/// Builder for creating Stepper instances.
///
/// Hardware parts are required. Profile settings start from
/// [`MotorConfig::new`] defaults and can be overridden one by one or taken
/// from a configuration file.
pub struct StepperBuilder<DIR, STEP, EN, MS, CLK, DELAY>
where
    DIR: OutputPin,
    STEP: OutputPin,
    EN: OutputPin,
    MS: MicrostepSelect,
    CLK: MicrosClock,
    DELAY: DelayNs,
{
    dir_pin: Option<DIR>,
    step_pin: Option<STEP>,
    enable_pin: Option<EN>,
    microstep: Option<MS>,
    clock: Option<CLK>,
    delay: Option<DELAY>,
    smooth_delay: Option<u32>,
    config: MotorConfig,
}

impl<DIR, STEP, EN, MS, CLK, DELAY> Default for StepperBuilder<DIR, STEP, EN, MS, CLK, DELAY>
where
    DIR: OutputPin,
    STEP: OutputPin,
    EN: OutputPin,
    MS: MicrostepSelect,
    CLK: MicrosClock,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<DIR, STEP, EN, MS, CLK, DELAY> StepperBuilder<DIR, STEP, EN, MS, CLK, DELAY>
where
    DIR: OutputPin,
    STEP: OutputPin,
    EN: OutputPin,
    MS: MicrostepSelect,
    CLK: MicrosClock,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            dir_pin: None,
            step_pin: None,
            enable_pin: None,
            microstep: None,
            clock: None,
            delay: None,
            smooth_delay: None,
            config: MotorConfig::new("motor", 0),
        }
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the ENABLE pin.
    pub fn enable_pin(mut self, pin: EN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set the microstep mode selection.
    pub fn microstep(mut self, microstep: MS) -> Self {
        self.microstep = Some(microstep);
        self
    }

    /// Set the microsecond clock.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.config.name = heapless::String::try_from(name).unwrap_or_default();
        self
    }

    /// Set the pulse interval at which the motor runs smoothly, in microseconds.
    pub fn smooth_delay(mut self, us: u32) -> Self {
        self.smooth_delay = Some(us);
        self
    }

    /// Set acceleration in full steps/s².
    pub fn acceleration(mut self, accel: f32) -> Self {
        self.config.acceleration = accel;
        self
    }

    /// Set cruise speed in full steps/s.
    pub fn target_speed(mut self, speed: f32) -> Self {
        self.config.target_speed = speed;
        self
    }

    /// Set the microstep level selected at construction.
    pub fn microsteps(mut self, level: MicrostepLevel) -> Self {
        self.config.microsteps = level;
        self
    }

    /// Set the DIR pin level that moves forward.
    pub fn forward_level(mut self, level: LogicLevel) -> Self {
        self.config.forward_level = level;
        self
    }

    /// Set the ENABLE pin level that powers the driver.
    pub fn enable_level(mut self, level: LogicLevel) -> Self {
        self.config.enable_level = level;
        self
    }

    /// Enable or disable speed-dependent microstep switching.
    pub fn adaptive_microstepping(mut self, adaptive: bool) -> Self {
        self.config.adaptive_microstepping = adaptive;
        self
    }

    /// Set driver timing constraints.
    pub fn timing(mut self, timing: DriverTiming) -> Self {
        self.config.timing = timing;
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.smooth_delay = Some(config.smooth_delay);
        self.config = config.clone();
        self
    }

    /// Configure from SystemConfig by motor name.
    pub fn from_config(self, config: &SystemConfig, motor_name: &str) -> Result<Self> {
        let motor_config = config.motor(motor_name).ok_or_else(|| {
            Error::Config(ConfigError::MotorNotFound(
                heapless::String::try_from(motor_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_motor_config(motor_config))
    }

    /// Build the Stepper.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingPart` if a hardware part or the smooth
    /// delay was not supplied, any validation error of the resulting
    /// configuration, or `MotorError::PinError` if the pins cannot be set up.
    pub fn build(self) -> Result<Stepper<DIR, STEP, EN, MS, CLK, DELAY>> {
        let dir_pin = self.dir_pin.ok_or(ConfigError::MissingPart("dir_pin"))?;
        let step_pin = self.step_pin.ok_or(ConfigError::MissingPart("step_pin"))?;
        let enable_pin = self
            .enable_pin
            .ok_or(ConfigError::MissingPart("enable_pin"))?;
        let microstep = self.microstep.ok_or(ConfigError::MissingPart("microstep"))?;
        let clock = self.clock.ok_or(ConfigError::MissingPart("clock"))?;
        let delay = self.delay.ok_or(ConfigError::MissingPart("delay"))?;
        let smooth_delay = self
            .smooth_delay
            .ok_or(ConfigError::MissingPart("smooth_delay"))?;

        let config = MotorConfig {
            smooth_delay,
            ..self.config
        };

        Stepper::new(
            dir_pin, step_pin, enable_pin, microstep, clock, delay, &config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::pins::FixedMicrostep;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    type Builder = StepperBuilder<PinMock, PinMock, PinMock, FixedMicrostep, fn() -> u32, NoopDelay>;

    fn zero() -> u32 {
        0
    }

    #[test]
    fn test_missing_part_is_reported() {
        let result = Builder::new().smooth_delay(500).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingPart("dir_pin")))
        ));
    }

    #[test]
    fn test_missing_smooth_delay_is_reported() {
        let mut pin = PinMock::new(&[]);
        let result = Builder::new()
            .dir_pin(pin.clone())
            .step_pin(pin.clone())
            .enable_pin(pin.clone())
            .microstep(FixedMicrostep)
            .clock(zero as fn() -> u32)
            .delay(NoopDelay::new())
            .build();

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingPart("smooth_delay")))
        ));
        pin.done();
    }

    #[test]
    fn test_build_with_overrides() {
        let mut dir = PinMock::new(&[Transaction::set(State::Low)]);
        let mut step = PinMock::new(&[Transaction::set(State::Low)]);
        let mut enable = PinMock::new(&[Transaction::set(State::Low)]);

        let stepper = Builder::new()
            .dir_pin(dir.clone())
            .step_pin(step.clone())
            .enable_pin(enable.clone())
            .microstep(FixedMicrostep)
            .clock(zero as fn() -> u32)
            .delay(NoopDelay::new())
            .name("z_axis")
            .smooth_delay(400)
            .forward_level(LogicLevel::Low)
            .enable_level(LogicLevel::High)
            .target_speed(50.0)
            .build()
            .unwrap();

        assert_eq!(stepper.name(), "z_axis");
        assert_eq!(stepper.target_delay_us(), 20_000);

        dir.done();
        step.done();
        enable.done();
    }
}
