//! Fuzz target for port accesses.
//!
//! Applies arbitrary key, joystick and register operations and checks that
//! the matrix views stay consistent and that reads are repeatable.

#![no_main]

use arbitrary::Arbitrary;
use cia1_keyboard::{Cia1Ports, Peripherals};
use libfuzzer_sys::fuzz_target;

/// One step of the fuzz sequence
#[derive(Debug, Arbitrary)]
enum Op {
    /// Press or release a key
    Key { row: u8, col: u8, pressed: bool },
    /// Engage or release SHIFT LOCK
    ShiftLock(bool),
    /// Set joystick state for a logical port
    Joystick { port: u8, state: u8 },
    /// Enable or disable matrix scanning
    KeyboardActive(bool),
    /// Register write
    Write { offset: u16, value: u8 },
    /// Register read
    Read { offset: u16 },
    /// Chip reset
    Reset,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.reset(&mut host);

    for op in ops {
        match op {
            Op::Key { row, col, pressed } => host.matrix.set_key(row & 7, col & 7, pressed),
            Op::ShiftLock(engaged) => host.matrix.set_shift_lock(engaged),
            Op::Joystick { port, state } => host.joystick.set_port(port, state),
            Op::KeyboardActive(active) => host.joystick.set_keyboard_active(active),
            Op::Write { offset, value } => cia.write_register(offset, value, &mut host),
            Op::Read { offset } => {
                cia.read_register(offset, &mut host);
            }
            Op::Reset => cia.reset(&mut host),
        }

        assert!(host.matrix.is_consistent());

        // Reads depend only on the current inputs and registers
        let a = cia.peek_port_a(&host);
        let b = cia.peek_port_b(&host);
        assert_eq!(cia.peek_port_a(&host), a);
        assert_eq!(cia.peek_port_b(&host), b);

        // Nothing reads high that the port itself drives low
        assert_eq!(a & cia.port_a().driven_low(), 0);
        assert_eq!(b & cia.port_b().driven_low(), 0);
        assert!(cia.pot_mask() <= 3);
        assert_eq!(host.pot_mask, cia.pot_mask());
    }
});
