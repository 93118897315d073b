//! Simulated driver hardware shared by the integration tests.
//!
//! All parts share one microsecond counter. The delay provider advances it,
//! so pulse widths show up in the returned timestamps the way they would on
//! hardware.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use stepper_ramp::error::MotorError;
use stepper_ramp::{
    MicrosClock, MicrostepLevel, MicrostepSelect, MotorConfig, Stepper, Timestamp,
};

pub type SimStepper = Stepper<SimPin, SimPin, SimPin, SimMicrostep, SimClock, SimDelay>;

/// Output pin remembering its level and counting rising edges.
#[derive(Clone, Default)]
pub struct SimPin {
    high: Rc<Cell<bool>>,
    rising: Rc<Cell<u32>>,
    writes: Rc<Cell<u32>>,
}

impl SimPin {
    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn rising_edges(&self) -> u32 {
        self.rising.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    fn write(&self, high: bool) {
        if high && !self.high.get() {
            self.rising.set(self.rising.get() + 1);
        }
        self.high.set(high);
        self.writes.set(self.writes.get() + 1);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

/// Mode selection recording every level it was asked for.
#[derive(Clone)]
pub struct SimMicrostep {
    levels: usize,
    selected: Rc<RefCell<Vec<u8>>>,
}

impl SimMicrostep {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            selected: Rc::default(),
        }
    }

    pub fn selected(&self) -> Vec<u8> {
        self.selected.borrow().clone()
    }
}

impl MicrostepSelect for SimMicrostep {
    fn levels(&self) -> usize {
        self.levels
    }

    fn select(&mut self, level: MicrostepLevel) -> Result<(), MotorError> {
        self.selected.borrow_mut().push(level.value());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    pub fn now(&self) -> u32 {
        self.0.get()
    }

    pub fn set(&self, us: u32) {
        self.0.set(us);
    }

    /// Jump to `instant` unless it has already passed.
    pub fn advance_to(&self, instant: Timestamp) {
        if !instant.is_reached(self.now()) {
            self.set(instant.as_micros());
        }
    }
}

impl MicrosClock for SimClock {
    fn now_us(&mut self) -> u32 {
        self.0.get()
    }
}

/// Delay that moves the shared clock instead of sleeping.
pub struct SimDelay(SimClock);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let clock = &self.0;
        clock.set(clock.now().wrapping_add(ns.saturating_add(999) / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        let clock = &self.0;
        clock.set(clock.now().wrapping_add(us));
    }
}

/// Handles on the simulated parts after they moved into the engine.
pub struct Rig {
    pub dir: SimPin,
    pub step: SimPin,
    pub enable: SimPin,
    pub microstep: SimMicrostep,
    pub clock: SimClock,
}

impl Rig {
    /// Build an engine on fresh simulated hardware.
    pub fn new(config: &MotorConfig) -> (Rig, SimStepper) {
        Self::with_levels(config, stepper_ramp::config::MICRO_LEVELS)
    }

    /// Same as [`Rig::new`] with a driver offering only `levels` levels.
    pub fn with_levels(config: &MotorConfig, levels: usize) -> (Rig, SimStepper) {
        let rig = Rig {
            dir: SimPin::default(),
            step: SimPin::default(),
            enable: SimPin::default(),
            microstep: SimMicrostep::new(levels),
            clock: SimClock::default(),
        };
        let stepper = Stepper::new(
            rig.dir.clone(),
            rig.step.clone(),
            rig.enable.clone(),
            rig.microstep.clone(),
            rig.clock.clone(),
            SimDelay(rig.clock.clone()),
            config,
        )
        .expect("simulated pins never fail");
        (rig, stepper)
    }

    /// Call `step()` once and jump the clock to the returned instant.
    pub fn tick(&self, stepper: &mut SimStepper) -> Option<Timestamp> {
        let next = stepper.step().expect("simulated pins never fail");
        if let Some(next) = next {
            self.clock.advance_to(next);
        }
        next
    }

    /// Step until arrival; returns the number of `step()` calls that asked
    /// to be called again.
    pub fn run(&self, stepper: &mut SimStepper, limit: u32) -> u32 {
        let mut calls = 0;
        while self.tick(stepper).is_some() {
            calls += 1;
            assert!(calls <= limit, "no arrival after {} calls", limit);
        }
        calls
    }
}

/// Configuration with a fixed microstep level and no adaptive switching.
pub fn fixed_config(accel: f32, speed: f32) -> MotorConfig {
    let mut config = MotorConfig::new("sim", 200);
    config.acceleration = accel;
    config.target_speed = speed;
    config.adaptive_microstepping = false;
    config
}
