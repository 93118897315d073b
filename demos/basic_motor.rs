//! Basic motor control example.
//!
//! Builds a stepper engine from a TOML configuration and moves it back and
//! forth, printing the ramp as it goes.
//!
//! Pins are stand-ins that only remember their level, so this runs without
//! hardware. The delay provider really sleeps.

use stepper_ramp::{parse_config, MicrostepPins, StdClock, Stepper};

const CONFIG: &str = r#"
[motors.demo]
name = "demo_motor"
smooth_delay_us = 400
acceleration = 400.0
target_speed = 300.0
microsteps = 1
adaptive_microstepping = true

[motors.demo.timing]
enable_settle_us = 2
mode_change_us = 2
step_pulse_us = 2
"#;

/// Delay provider backed by the OS scheduler.
struct StdDelay;

impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Output pin stand-in.
struct MockPin {
    state: bool,
}

impl MockPin {
    fn new() -> Self {
        Self { state: false }
    }
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

fn main() -> stepper_ramp::Result<()> {
    println!("=== Basic Motor Control Example ===\n");

    let config = parse_config(CONFIG)?;

    let mut motor = Stepper::builder()
        .from_config(&config, "demo")?
        .dir_pin(MockPin::new())
        .step_pin(MockPin::new())
        .enable_pin(MockPin::new())
        .microstep(MicrostepPins::new(
            MockPin::new(),
            MockPin::new(),
            MockPin::new(),
        ))
        .clock(StdClock::new())
        .delay(StdDelay)
        .build()?;

    println!("Motor created: {}", motor.name());
    println!(
        "Starting delay: {} us, cruise delay: {} us (shift {})",
        motor.current_delay_us(),
        motor.target_delay_us(),
        motor.shift()
    );

    let ready = motor.on()?;
    motor.wait_until(ready);

    for target in [200, -50, 0] {
        println!("\n--- Moving to {} full steps ---", target);
        motor.set_target_position(target);

        let mut last_state = None;
        let mut pulses = 0u32;
        while let Some(next) = motor.step()? {
            pulses += 1;
            let state = motor.state();
            if last_state != Some(state) {
                println!(
                    "  {:>6} us/step  1/{:<2}  {:?}",
                    motor.current_delay_us(),
                    motor.microstep_level().microsteps(),
                    state
                );
                last_state = Some(state);
            }
            motor.wait_until(next);
        }

        println!(
            "Arrived at {} full steps after {} calls",
            motor.position_full_steps(),
            pulses
        );
    }

    motor.off()?;
    println!("\n=== Example Complete ===");
    Ok(())
}
