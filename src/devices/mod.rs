//! CIA1 port hardware.
//!
//! - [`PortRegisters`]: DDR, output latch and last sampled value of one port
//! - [`Cia1Ports`]: keyboard/joystick read and write logic across both ports

mod cia1;
mod port;

pub use cia1::{regs, Cia1Ports, LIGHT_PEN_BIT};
pub use port::PortRegisters;
