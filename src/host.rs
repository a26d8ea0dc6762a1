//! Collaborators of the port core.
//!
//! The port logic does not own the keyboard, the joysticks, the clock or
//! the video chip. Each access receives them through [`PortHost`], so the
//! caller decides where that state lives and the borrow checker keeps it
//! from changing in the middle of an access.

use crate::joystick::JoystickPorts;
use crate::matrix::KeyMatrix;

/// Everything a port access consults or notifies.
///
/// Only the two input views are required. The hooks default to no-ops for
/// hosts that have no timer, light pen or paddle multiplexer attached.
pub trait PortHost {
    /// Live keyboard matrix (including the SHIFT LOCK latch).
    fn matrix(&self) -> &KeyMatrix;

    /// Joystick pins and the keyboard enable line.
    fn joystick(&self) -> &JoystickPorts;

    /// Run time-dependent side effects that must happen before this access.
    fn flush_alarms(&mut self) {}

    /// Current clock tick.
    fn clock(&self) -> u64 {
        0
    }

    /// Light pen line changed level. `asserted` is true when the line went
    /// low.
    fn light_pen(&mut self, _asserted: bool, _clk: u64) {}

    /// Paddle multiplexer selection from port A bits 6-7.
    fn set_pot_mask(&mut self, _mask: u8) {}
}

/// Light pen transition seen by [`Peripherals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightPenEvent {
    pub asserted: bool,
    pub clock: u64,
}

/// Self-contained host: owns the input devices and records the side
/// effects it receives.
#[derive(Debug, Clone, Default)]
pub struct Peripherals {
    /// Keyboard matrix.
    pub matrix: KeyMatrix,
    /// Joystick ports.
    pub joystick: JoystickPorts,
    /// Clock value reported to the port core.
    pub clock: u64,
    /// Light pen transitions, oldest first.
    pub light_pen_events: Vec<LightPenEvent>,
    /// Last paddle selection received.
    pub pot_mask: u8,
    /// Number of alarm flushes requested.
    pub alarm_flushes: u64,
}

impl Peripherals {
    /// Create a host with no keys or buttons pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded light pen transitions.
    pub fn take_light_pen_events(&mut self) -> Vec<LightPenEvent> {
        std::mem::take(&mut self.light_pen_events)
    }
}

impl PortHost for Peripherals {
    fn matrix(&self) -> &KeyMatrix {
        &self.matrix
    }

    fn joystick(&self) -> &JoystickPorts {
        &self.joystick
    }

    fn flush_alarms(&mut self) {
        self.alarm_flushes += 1;
    }

    fn clock(&self) -> u64 {
        self.clock
    }

    fn light_pen(&mut self, asserted: bool, clk: u64) {
        self.light_pen_events.push(LightPenEvent {
            asserted,
            clock: clk,
        });
    }

    fn set_pot_mask(&mut self, mask: u8) {
        self.pot_mask = mask;
    }
}
