//! Integration tests for CIA1 keyboard and joystick port reads.
//!
//! These tests drive the ports the way C64 software does: program the DDRs,
//! select lines through one port and read the other.

use cia1_keyboard::{keys, snapshot, Cia1Ports, Connectivity, Peripherals, SHIFT_LOCK_ROW};

/// Port A outputs (rows), port B inputs (columns).
fn row_scan_setup() -> (Cia1Ports, Peripherals) {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.write_ddr_a(0xFF, &mut host);
    cia.write_ddr_b(0x00, &mut host);
    (cia, host)
}

/// Port B outputs (columns), port A inputs (rows).
fn column_scan_setup() -> (Cia1Ports, Peripherals) {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.write_ddr_a(0x00, &mut host);
    cia.write_ddr_b(0xFF, &mut host);
    (cia, host)
}

#[test]
fn test_idle_ports_match_register_combination() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();

    for &(ddr_a, pra, ddr_b, prb) in &[
        (0x00, 0x00, 0x00, 0x00),
        (0xFF, 0xAA, 0x00, 0x00),
        (0x0F, 0x03, 0xF0, 0x50),
        (0xFF, 0x00, 0xFF, 0xFF),
    ] {
        cia.write_ddr_a(ddr_a, &mut host);
        cia.write_port_a(pra, &mut host);
        cia.write_ddr_b(ddr_b, &mut host);
        cia.write_port_b(prb, &mut host);

        assert_eq!(cia.read_port_a(&mut host), pra | !ddr_a);
        assert_eq!(cia.read_port_b(&mut host), prb | !ddr_b);
    }
}

#[test]
fn test_full_row_scan_finds_each_key() {
    let (mut cia, mut host) = row_scan_setup();

    for row in 0..8u8 {
        for col in 0..8u8 {
            host.matrix.release_all();
            host.matrix.key_down(row, col);

            for select in 0..8u8 {
                cia.write_port_a(!(1 << select), &mut host);
                let expected = if select == row { !(1u8 << col) } else { 0xFF };
                assert_eq!(
                    cia.read_port_b(&mut host),
                    expected,
                    "key ({}, {}) with row {} selected",
                    row,
                    col,
                    select
                );
            }
        }
    }
}

#[test]
fn test_single_key_column_scan() {
    let (mut cia, mut host) = column_scan_setup();
    host.matrix.key_down(keys::SPACE.0, keys::SPACE.1);

    cia.write_port_b(!(1 << keys::SPACE.1), &mut host);
    assert_eq!(cia.read_port_a(&mut host), !(1 << keys::SPACE.0));

    cia.write_port_b(0xFF, &mut host);
    assert_eq!(cia.read_port_a(&mut host), 0xFF);
}

#[test]
fn test_three_key_ghost() {
    let (mut cia, mut host) = row_scan_setup();
    // A (1,2), D (2,2), C (2,4): row 1 reaches column 4 through row 2
    host.matrix.key_down(keys::A.0, keys::A.1);
    host.matrix.key_down(keys::D.0, keys::D.1);
    host.matrix.key_down(keys::C.0, keys::C.1);

    cia.write_port_a(!(1 << 1), &mut host);
    assert_eq!(cia.read_port_b(&mut host), !((1 << 2) | (1 << 4)));

    // Column scan sees the ghost too: column 4 reaches row 1
    cia.write_ddr_a(0x00, &mut host);
    cia.write_ddr_b(0xFF, &mut host);
    cia.write_port_b(!(1 << 4), &mut host);
    assert_eq!(cia.read_port_a(&mut host), !((1 << 1) | (1 << 2)));
}

#[test]
fn test_triangle_is_order_independent() {
    // The same three keys pressed in every order give the same closure
    let triangle = [(0u8, 0u8), (0, 1), (1, 1)];
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let mut results = Vec::new();
    for order in orders {
        let mut host = Peripherals::new();
        for i in order {
            let (row, col) = triangle[i];
            host.matrix.key_down(row, col);
        }
        let solver = Connectivity::new(&host.matrix);
        results.push((0..8u8).map(|c| solver.rows_from_column(c)).collect::<Vec<_>>());
    }

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0][0], 0b11);
    assert_eq!(results[0][1], 0b11);
}

#[test]
fn test_every_key_pressed_terminates() {
    let (mut cia, mut host) = row_scan_setup();
    for row in 0..8 {
        for col in 0..8 {
            host.matrix.key_down(row, col);
        }
    }

    cia.write_port_a(0xFE, &mut host);
    assert_eq!(cia.read_port_b(&mut host), 0x00);
}

#[test]
fn test_shift_lock_reads_as_left_shift() {
    let (mut cia, mut host) = row_scan_setup();
    host.matrix.set_shift_lock(true);

    cia.write_port_a(!(1 << SHIFT_LOCK_ROW), &mut host);
    assert_eq!(cia.read_port_b(&mut host), 0x7F);
}

#[test]
fn test_shift_lock_forces_single_row() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    host.matrix.set_shift_lock(true);

    // Only row 1 driven low, column 7 driven high by port B
    cia.write_ddr_a(0xFF, &mut host);
    cia.write_port_a(0xFD, &mut host);
    cia.write_ddr_b(0x80, &mut host);
    cia.write_port_b(0xFF, &mut host);

    assert_eq!(cia.read_port_b(&mut host) & 0x80, 0);
}

#[test]
fn test_majority_rule_boundary() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.write_ddr_a(0xFF, &mut host);
    cia.write_ddr_b(0x08, &mut host);
    cia.write_port_b(0x08, &mut host);
    host.matrix.key_down(2, 3);
    host.matrix.key_down(4, 3);
    host.matrix.key_down(6, 3);

    // One driven row on column 3: output high wins
    cia.write_port_a(!(1 << 2), &mut host);
    assert_eq!(cia.read_port_b(&mut host), 0xFF);

    // Two driven rows: forced low
    cia.write_port_a(!((1 << 2) | (1 << 4)), &mut host);
    assert_eq!(cia.read_port_b(&mut host), !(1 << 3));

    // Three driven rows: still low
    cia.write_port_a(!((1 << 2) | (1 << 4) | (1 << 6)), &mut host);
    assert_eq!(cia.read_port_b(&mut host), !(1 << 3));
}

#[test]
fn test_majority_rule_counts_driven_rows_only() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    // Row 2 driven low, row 4 an input; both on column 3
    cia.write_ddr_a(0x04, &mut host);
    cia.write_port_a(0x00, &mut host);
    cia.write_ddr_b(0x08, &mut host);
    cia.write_port_b(0x08, &mut host);
    host.matrix.key_down(2, 3);
    host.matrix.key_down(4, 3);

    assert_eq!(cia.read_port_b(&mut host), 0xFF);
}

#[test]
fn test_pot_mask_without_read() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.write_ddr_a(0xFF, &mut host);

    cia.write_port_a(0x7F, &mut host);
    assert_eq!(cia.pot_mask(), 0x01);
    assert_eq!(host.pot_mask, 0x01);

    cia.write_port_a(0xBF, &mut host);
    assert_eq!(cia.pot_mask(), 0x02);
    assert_eq!(host.pot_mask, 0x02);
}

#[test]
fn test_snapshot_round_trip_reproduces_reads() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.write_ddr_a(0xFF, &mut host);
    cia.write_port_a(0xF9, &mut host);
    cia.write_ddr_b(0x10, &mut host);
    cia.write_port_b(0x10, &mut host);

    let bytes = snapshot::save(&cia);
    let mut restored = Cia1Ports::default();
    let mut other_host = Peripherals::new();
    snapshot::restore(&mut restored, &bytes, &mut other_host).unwrap();
    assert_eq!(other_host.pot_mask, host.pot_mask);

    for &(row, col) in &[(1u8, 4u8), (2, 4), (2, 0), (5, 5)] {
        host.matrix.key_down(row, col);
        other_host.matrix.key_down(row, col);
        host.joystick.set_port(2, 0x01);
        other_host.joystick.set_port(2, 0x01);

        assert_eq!(
            cia.read_port_a(&mut host),
            restored.read_port_a(&mut other_host)
        );
        assert_eq!(
            cia.read_port_b(&mut host),
            restored.read_port_b(&mut other_host)
        );
    }
}

#[test]
fn test_reset_keeps_matrix() {
    let (mut cia, mut host) = row_scan_setup();
    host.matrix.key_down(3, 3);
    cia.reset(&mut host);

    assert!(host.matrix.is_key_pressed(3, 3));
    cia.write_ddr_a(0xFF, &mut host);
    cia.write_port_a(!(1 << 3), &mut host);
    assert_eq!(cia.read_port_b(&mut host), !(1 << 3));
}

#[test]
fn test_fire_held_across_reset_reports_once() {
    let (mut cia, mut host) = row_scan_setup();
    host.joystick.set_port(1, 0x10);

    cia.read_port_b(&mut host);
    cia.reset(&mut host);
    cia.read_port_b(&mut host);
    cia.read_port_a(&mut host);

    let events = host.take_light_pen_events();
    assert_eq!(events.len(), 1);
    assert!(events[0].asserted);
}

#[test]
fn test_reset_and_restore_forward_paddle_select() {
    let mut cia = Cia1Ports::default();
    let mut host = Peripherals::new();
    cia.write_ddr_a(0xFF, &mut host);
    cia.write_port_a(0x3F, &mut host);
    let bytes = snapshot::save(&cia);

    cia.reset(&mut host);
    assert_eq!(host.pot_mask, cia.pot_mask());
    assert_eq!(host.pot_mask, 0x03);

    snapshot::restore(&mut cia, &bytes, &mut host).unwrap();
    assert_eq!(cia.pot_mask(), 0x00);
    assert_eq!(host.pot_mask, 0x00);
}
