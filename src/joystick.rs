//! C64 joystick digital inputs.
//!
//! The C64 has two control ports, each with 4 directions and a fire button.
//! The lines are active-low and share CIA1 pins with the keyboard matrix:
//!
//! - Port 1: CIA1 port B bits 0-4 (keyboard columns 0-4)
//! - Port 2: CIA1 port A bits 0-4 (keyboard rows 0-4)
//!
//! Port 1 fire (port B bit 4) doubles as the light pen input.

/// Joystick direction and button constants (active-high for input).
pub mod bits {
    /// Up direction bit.
    pub const JOY_UP: u8 = 0x01;
    /// Down direction bit.
    pub const JOY_DOWN: u8 = 0x02;
    /// Left direction bit.
    pub const JOY_LEFT: u8 = 0x04;
    /// Right direction bit.
    pub const JOY_RIGHT: u8 = 0x08;
    /// Fire button bit.
    pub const JOY_FIRE: u8 = 0x10;
}

pub use bits::*;

/// State of a single joystick port.
///
/// Bits are active-high (1 = pressed) for the public API and converted to
/// active-low for the CIA pins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoystickState {
    state: u8,
}

impl JoystickState {
    /// Create a new joystick state with no buttons pressed.
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Set the complete joystick state (active-high; bits above 4 ignored).
    #[inline]
    pub fn set(&mut self, state: u8) {
        self.state = state & 0x1F;
    }

    /// Get the current state (active-high).
    #[inline]
    pub fn get(&self) -> u8 {
        self.state
    }

    /// Full 8-bit pin mask as seen by the CIA (0 = actuated).
    ///
    /// Bits 5-7 are not wired and always read 1.
    #[inline]
    pub fn digital(&self) -> u8 {
        !self.state | 0xE0
    }

    /// Release all buttons.
    #[inline]
    pub fn release_all(&mut self) {
        self.state = 0;
    }
}

/// Both joystick ports plus the keyboard enable line.
#[derive(Debug, Clone)]
pub struct JoystickPorts {
    /// Port 1 state (CIA1 port B).
    port1: JoystickState,
    /// Port 2 state (CIA1 port A).
    port2: JoystickState,
    /// Swap ports (maps logical port 2 input to physical port 1 and vice versa).
    swapped: bool,
    /// Matrix scanning enabled. Cleared when an adapter replaces the keyboard.
    keyboard_active: bool,
}

impl JoystickPorts {
    /// Create new joystick ports with the keyboard enabled.
    pub fn new() -> Self {
        Self {
            port1: JoystickState::new(),
            port2: JoystickState::new(),
            swapped: false,
            keyboard_active: true,
        }
    }

    /// Set joystick state for a logical port (1 or 2).
    ///
    /// If ports are swapped, port 2 input goes to physical port 1 and vice
    /// versa. Other port numbers are ignored.
    pub fn set_port(&mut self, port: u8, state: u8) {
        match (port, self.swapped) {
            (1, false) | (2, true) => self.port1.set(state),
            (2, false) | (1, true) => self.port2.set(state),
            _ => {}
        }
    }

    /// Active-low pin mask of a physical port (1 or 2). Unknown ports read
    /// as idle (0xFF).
    pub fn digital(&self, port: u8) -> u8 {
        match port {
            1 => self.port1.digital(),
            2 => self.port2.digital(),
            _ => 0xFF,
        }
    }

    #[inline]
    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    #[inline]
    pub fn set_swapped(&mut self, swapped: bool) {
        self.swapped = swapped;
    }

    /// Whether the keyboard matrix takes part in port reads.
    #[inline]
    pub fn keyboard_active(&self) -> bool {
        self.keyboard_active
    }

    #[inline]
    pub fn set_keyboard_active(&mut self, active: bool) {
        self.keyboard_active = active;
    }

    /// Release all buttons on both ports.
    pub fn release_all(&mut self) {
        self.port1.release_all();
        self.port2.release_all();
    }
}

impl Default for JoystickPorts {
    fn default() -> Self {
        Self::new()
    }
}
