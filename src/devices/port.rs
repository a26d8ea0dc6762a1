//! CIA I/O port register model.

/// Registers of one 8-bit CIA port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRegisters {
    /// Output latch (PRA/PRB).
    data: u8,
    /// Data direction register (0=input, 1=output).
    ddr: u8,
    /// Last bus value observed on the port.
    sampled: u8,
}

impl PortRegisters {
    /// Create a new port with all pins as input.
    pub const fn new() -> Self {
        Self {
            data: 0,
            ddr: 0,
            sampled: 0xFF,
        }
    }

    #[inline]
    pub fn data(&self) -> u8 {
        self.data
    }

    #[inline]
    pub fn ddr(&self) -> u8 {
        self.ddr
    }

    #[inline]
    pub fn sampled(&self) -> u8 {
        self.sampled
    }

    #[inline]
    pub fn write_data(&mut self, value: u8) {
        self.data = value;
    }

    #[inline]
    pub fn write_ddr(&mut self, value: u8) {
        self.ddr = value;
    }

    #[inline]
    pub(crate) fn set_sampled(&mut self, value: u8) {
        self.sampled = value;
    }

    /// Level the port drives onto its pins. Inputs float high.
    #[inline]
    pub fn level(&self) -> u8 {
        self.data | !self.ddr
    }

    /// Pins actively driven high.
    #[inline]
    pub fn driven_high(&self) -> u8 {
        self.data & self.ddr
    }

    /// Pins actively driven low.
    #[inline]
    pub fn driven_low(&self) -> u8 {
        !self.data & self.ddr
    }
}

impl Default for PortRegisters {
    fn default() -> Self {
        Self::new()
    }
}
