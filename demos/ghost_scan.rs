//! KERNAL-style keyboard scan showing ghost keys.
//!
//! Presses three keys that form a rectangle corner and scans every row the
//! way the C64 KERNAL does: drive one row low on port A, read port B.
//!
//! Run with: cargo run --example ghost_scan

use cia1_keyboard::{keys, Cia1Ports, Peripherals};
use log::info;

fn main() {
    colog::basic_builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();

    cia.write_ddr_a(0xFF, &mut host);
    cia.write_ddr_b(0x00, &mut host);

    // A, D and C: row 1 picks up a phantom at column 4 through row 2
    for (row, col) in [keys::A, keys::D, keys::C] {
        host.matrix.key_down(row, col);
    }

    for row in 0..8u8 {
        cia.write_port_a(!(1 << row), &mut host);
        let cols = cia.read_port_b(&mut host);
        let mut pressed = Vec::new();
        for col in 0..8u8 {
            if cols & (1 << col) == 0 {
                let real = host.matrix.is_key_pressed(row, col);
                pressed.push(format!("({},{}){}", row, col, if real { "" } else { " ghost" }));
            }
        }
        info!("row {} -> ${:02X} {}", row, cols, pressed.join(" "));
    }

    for event in host.take_light_pen_events() {
        info!(
            "light pen {} at {}",
            if event.asserted { "asserted" } else { "released" },
            event.clock
        );
    }
}
