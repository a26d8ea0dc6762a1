//! # CIA1 Keyboard and Joystick Ports
//!
//! Emulation of the two 8-bit I/O ports of the C64's CIA1 (MOS 6526) as
//! used to scan the keyboard matrix and the digital joystick ports,
//! including keyboard ghosting.
//!
//! ## Quick Start
//!
//! ```rust
//! use cia1_keyboard::{keys, Cia1Ports, Peripherals};
//!
//! let mut cia = Cia1Ports::default();
//! let mut host = Peripherals::new();
//!
//! // KERNAL-style scan: port A drives rows, port B reads columns
//! cia.write_ddr_a(0xFF, &mut host);
//! cia.write_ddr_b(0x00, &mut host);
//!
//! // Press 'A' (row 1, column 2) and select row 1
//! host.matrix.key_down(keys::A.0, keys::A.1);
//! cia.write_port_a(0xFD, &mut host);
//!
//! assert_eq!(cia.read_port_b(&mut host), 0xFB);
//! ```
//!
//! ## Architecture
//!
//! - **Matrix store** ([`KeyMatrix`]): closed contacts kept by row and by column
//! - **Connectivity solver** ([`Connectivity`]): lines joined through closed keys
//! - **Port registers** ([`PortRegisters`]): DDR, latch, last sampled value
//! - **Port access** ([`Cia1Ports`]): the bytes the CPU sees and the side
//!   effects of port writes
//!
//! Keyboard, joysticks, clock and light pen are collaborators reached
//! through the [`PortHost`] trait on every access.

pub mod config;
pub mod devices;
pub mod host;
pub mod joystick;
pub mod matrix;
pub mod snapshot;
pub mod solver;

// WASM bindings (optional, enabled with "wasm" feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use config::{CiaModel, PortsConfig};
pub use devices::{regs, Cia1Ports, PortRegisters, LIGHT_PEN_BIT};
pub use host::{LightPenEvent, Peripherals, PortHost};
pub use joystick::{JoystickPorts, JoystickState};
pub use matrix::{keys, KeyMatrix, SHIFT_LOCK_COL, SHIFT_LOCK_ROW};
pub use snapshot::{SnapshotError, SnapshotResult, SnapshotVersion, SNAPSHOT_VERSION};
pub use solver::{Connectivity, Line, Reach};
