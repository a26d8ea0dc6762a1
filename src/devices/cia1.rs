//! CIA1 keyboard and joystick port logic.
//!
//! CIA1 port A drives the keyboard rows and carries joystick port 2; port B
//! drives the keyboard columns and carries joystick port 1. Both ports can
//! be inputs or outputs per bit, so a scan can run in either direction and
//! the value seen on a read depends on:
//!
//! - the DDR and output latch of both ports
//! - the joystick switches, which short lines to ground
//! - every closed key contact, including ghost paths through several keys
//!
//! ## Register Map (offsets mirror every 16 bytes)
//!
//! | Offset | Register | Description |
//! |--------|----------|-------------|
//! | 0      | PRA      | Port A data (rows, joystick 2, paddle select) |
//! | 1      | PRB      | Port B data (columns, joystick 1, light pen) |
//! | 2      | DDRA     | Port A data direction |
//! | 3      | DDRB     | Port B data direction |
//!
//! The remaining offsets belong to the timer and interrupt logic and are
//! not handled here.

use log::{debug, trace};

use super::port::PortRegisters;
use crate::config::{CiaModel, PortsConfig};
use crate::host::PortHost;
use crate::matrix::SHIFT_LOCK_ROW;
use crate::solver::Connectivity;

/// Port B bit wired to the light pen input (joystick 1 fire).
pub const LIGHT_PEN_BIT: u8 = 0x10;

/// Register offsets handled by the port core.
pub mod regs {
    pub const PRA: u16 = 0x00;
    pub const PRB: u16 = 0x01;
    pub const DDRA: u16 = 0x02;
    pub const DDRB: u16 = 0x03;
}

/// Port half of a CIA1 chip context.
///
/// One instance per chip. The keyboard, joysticks and other collaborators
/// are passed in on every access through [`PortHost`].
#[derive(Debug, Clone)]
pub struct Cia1Ports {
    config: PortsConfig,
    port_a: PortRegisters,
    port_b: PortRegisters,
    /// Paddle multiplexer selection (port A bits 6-7).
    pot_mask: u8,
    /// Serial burst alarm armed (owned by the timer logic, kept for snapshots).
    alarm_active: bool,
}

impl Cia1Ports {
    pub fn new(config: PortsConfig) -> Self {
        let port_a = PortRegisters::new();
        let pot_mask = pot_select(port_a.level());
        Self {
            config,
            port_a,
            port_b: PortRegisters::new(),
            pot_mask,
            alarm_active: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &PortsConfig {
        &self.config
    }

    #[inline]
    pub fn model(&self) -> CiaModel {
        self.config.model
    }

    #[inline]
    pub fn port_a(&self) -> &PortRegisters {
        &self.port_a
    }

    #[inline]
    pub fn port_b(&self) -> &PortRegisters {
        &self.port_b
    }

    /// Current paddle multiplexer selection (0-3).
    #[inline]
    pub fn pot_mask(&self) -> u8 {
        self.pot_mask
    }

    #[inline]
    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    pub fn set_alarm_active(&mut self, active: bool) {
        self.alarm_active = active;
    }

    /// Reset the port registers to power-on state. The key matrix is not
    /// touched.
    ///
    /// The last sampled bus values survive, so the light pen only reports a
    /// transition the reset actually causes. The new paddle selection is
    /// pushed to the host.
    pub fn reset<H: PortHost + ?Sized>(&mut self, host: &mut H) {
        let sampled_a = self.port_a.sampled();
        let sampled_b = self.port_b.sampled();
        self.port_a = PortRegisters::new();
        self.port_b = PortRegisters::new();
        self.port_a.set_sampled(sampled_a);
        self.port_b.set_sampled(sampled_b);
        self.alarm_active = false;
        self.port_a_changed(host);
    }

    // =========================================================================
    // Read path
    // =========================================================================

    /// Value on the port A pins, without side effects.
    pub fn peek_port_a<H: PortHost + ?Sized>(&self, host: &H) -> u8 {
        let joy = host.joystick();
        let joy1 = joy.digital(1);
        let joy2 = joy.digital(2);
        let mut val = 0xFF;

        if joy.keyboard_active() {
            let solver = Connectivity::new(host.matrix());

            // Columns held low by port B or joystick 1 pull their rows down.
            // A column port B drives high only reads low because of the
            // joystick, and the output keeps it off the matrix.
            let col_low = self.port_b.level() & joy1;
            let held_high = self.port_b.driven_high();
            for col in 0..8 {
                let bit = 1 << col;
                if col_low & bit == 0 && held_high & bit == 0 {
                    val &= !solver.rows_from_column(col);
                }
            }

            // Rows held low by port A or joystick 2 spread to rows sharing a
            // column with them.
            let row_low = self.port_a.level() & joy2;
            for row in 0..8 {
                if row_low & (1 << row) == 0 {
                    val &= !solver.rows_from_row(row);
                }
            }
        }

        val & self.port_a.level() & joy2
    }

    /// Value on the port B pins, without side effects.
    pub fn peek_port_b<H: PortHost + ?Sized>(&self, host: &H) -> u8 {
        let joy = host.joystick();
        let joy1 = joy.digital(1);
        let joy2 = joy.digital(2);
        let mut val = 0xFF;

        if joy.keyboard_active() {
            let matrix = host.matrix();
            let solver = Connectivity::new(matrix);
            let held_high = self.port_b.driven_high();
            let rows_driven_low = self.port_a.driven_low();

            let row_low = self.port_a.level() & joy2;
            for row in 0..8 {
                if row_low & (1 << row) != 0 {
                    continue;
                }
                let cols = solver.cols_from_row(row);
                val &= !(cols & !held_high);

                // Port B output high against a low row: the output wins
                // unless SHIFT LOCK sits on that row or two or more driven
                // rows gang up on the column.
                let contended = cols & held_high;
                for col in 0..8 {
                    let bit = 1 << col;
                    if contended & bit == 0 {
                        continue;
                    }
                    let shift_locked = row == SHIFT_LOCK_ROW && matrix.shift_lock();
                    let driving_rows = solver.rows_from_column(col) & rows_driven_low;
                    if shift_locked || driving_rows.count_ones() >= 2 {
                        val &= !bit;
                    }
                }
            }

            let col_low = self.port_b.level() & joy1;
            for col in 0..8 {
                if col_low & (1 << col) == 0 {
                    val &= !(solver.cols_from_column(col) & !held_high);
                }
            }
        }

        val & self.port_b.level() & joy1
    }

    /// CPU read of PRA.
    pub fn read_port_a<H: PortHost + ?Sized>(&mut self, host: &mut H) -> u8 {
        host.flush_alarms();
        let value = self.peek_port_a(&*host);
        self.port_a.set_sampled(value);
        self.check_light_pen(host);
        value
    }

    /// CPU read of PRB. Runs the light pen edge check.
    pub fn read_port_b<H: PortHost + ?Sized>(&mut self, host: &mut H) -> u8 {
        host.flush_alarms();
        let value = self.peek_port_b(&*host);
        self.sample_port_b(value, host);
        value
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// CPU write of PRA.
    pub fn write_port_a<H: PortHost + ?Sized>(&mut self, value: u8, host: &mut H) {
        host.flush_alarms();
        trace!("CIA1 PRA <- ${:02X}", value);
        self.port_a.write_data(value);
        self.port_a_changed(host);
    }

    /// CPU write of DDRA.
    pub fn write_ddr_a<H: PortHost + ?Sized>(&mut self, value: u8, host: &mut H) {
        host.flush_alarms();
        trace!("CIA1 DDRA <- ${:02X}", value);
        self.port_a.write_ddr(value);
        self.port_a_changed(host);
    }

    /// CPU write of PRB.
    pub fn write_port_b<H: PortHost + ?Sized>(&mut self, value: u8, host: &mut H) {
        host.flush_alarms();
        trace!("CIA1 PRB <- ${:02X}", value);
        self.port_b.write_data(value);
        self.check_light_pen(host);
    }

    /// CPU write of DDRB.
    pub fn write_ddr_b<H: PortHost + ?Sized>(&mut self, value: u8, host: &mut H) {
        host.flush_alarms();
        trace!("CIA1 DDRB <- ${:02X}", value);
        self.port_b.write_ddr(value);
        self.check_light_pen(host);
    }

    /// Re-evaluate the light pen line.
    ///
    /// Called after every port write; joystick or keyboard collaborators
    /// may also call it after changing their inputs.
    pub fn check_light_pen<H: PortHost + ?Sized>(&mut self, host: &mut H) {
        let value = self.peek_port_b(&*host);
        self.sample_port_b(value, host);
    }

    fn port_a_changed<H: PortHost + ?Sized>(&mut self, host: &mut H) {
        let mask = pot_select(self.port_a.level());
        if mask != self.pot_mask {
            debug!("CIA1 paddle select {} -> {}", self.pot_mask, mask);
        }
        self.pot_mask = mask;
        host.set_pot_mask(mask);

        // Rows driven from port A reach the light pen column through the
        // matrix.
        self.check_light_pen(host);
    }

    fn sample_port_b<H: PortHost + ?Sized>(&mut self, value: u8, host: &mut H) {
        let previous = self.port_b.sampled();
        if (previous ^ value) & LIGHT_PEN_BIT != 0 {
            let asserted = value & LIGHT_PEN_BIT == 0;
            let clk = host.clock();
            debug!("CIA1 light pen line {} at {}", if asserted { "low" } else { "high" }, clk);
            host.light_pen(asserted, clk);
        }
        self.port_b.set_sampled(value);
    }

    // =========================================================================
    // Register dispatch
    // =========================================================================

    /// Read a chip register. Offsets outside the port block read as $FF.
    pub fn read_register<H: PortHost + ?Sized>(&mut self, offset: u16, host: &mut H) -> u8 {
        match offset & 0x0F {
            regs::PRA => self.read_port_a(host),
            regs::PRB => self.read_port_b(host),
            regs::DDRA => {
                host.flush_alarms();
                self.port_a.ddr()
            }
            regs::DDRB => {
                host.flush_alarms();
                self.port_b.ddr()
            }
            _ => 0xFF,
        }
    }

    /// Write a chip register. Offsets outside the port block are ignored.
    pub fn write_register<H: PortHost + ?Sized>(&mut self, offset: u16, value: u8, host: &mut H) {
        match offset & 0x0F {
            regs::PRA => self.write_port_a(value, host),
            regs::PRB => self.write_port_b(value, host),
            regs::DDRA => self.write_ddr_a(value, host),
            regs::DDRB => self.write_ddr_b(value, host),
            _ => {}
        }
    }

    // =========================================================================
    // Save State Accessors
    // =========================================================================

    pub(crate) fn restore_bank<H: PortHost + ?Sized>(
        &mut self,
        pot_mask: u8,
        alarm_active: bool,
        host: &mut H,
    ) {
        self.pot_mask = pot_mask & 0x03;
        self.alarm_active = alarm_active;
        host.set_pot_mask(self.pot_mask);
    }

    pub(crate) fn restore_ports(&mut self, port_a: PortRegisters, port_b: PortRegisters) {
        self.port_a = port_a;
        self.port_b = port_b;
    }
}

impl Default for Cia1Ports {
    fn default() -> Self {
        Self::new(PortsConfig::default())
    }
}

/// Paddle multiplexer selection from the port A level.
#[inline]
fn pot_select(level: u8) -> u8 {
    (level >> 6) & 0x03
}
