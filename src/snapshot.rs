//! Snapshot save/restore for the port core.
//!
//! ## Binary Format
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 1    | Version major |
//! | 1      | 1    | Version minor |
//! | 2      | 1    | Chip model selector |
//! | 3      | 1    | Output bank (paddle select) index |
//! | 4      | 1    | Alarm active flag (0/1) |
//! | 5      | 6    | PRA, PRB, DDRA, DDRB, sampled A, sampled B (minor >= 1) |
//!
//! A record whose version is newer than [`SNAPSHOT_VERSION`] is rejected
//! before any body byte is read. The whole record is validated before
//! anything is applied, so a failed restore leaves the chip untouched.
//!
//! ## Usage
//!
//! ```rust
//! use cia1_keyboard::{snapshot, Cia1Ports, Peripherals};
//!
//! let cia = Cia1Ports::default();
//! let bytes = snapshot::save(&cia);
//!
//! let mut restored = Cia1Ports::default();
//! let mut host = Peripherals::new();
//! snapshot::restore(&mut restored, &bytes, &mut host).unwrap();
//! assert_eq!(restored.pot_mask(), cia.pot_mask());
//! ```

use log::warn;
use thiserror::Error;

use crate::config::CiaModel;
use crate::devices::{Cia1Ports, PortRegisters};
use crate::host::PortHost;

/// Snapshot format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotVersion {
    pub major: u8,
    pub minor: u8,
}

impl SnapshotVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Version written by [`save`]. Minor 1 added the register block.
pub const SNAPSHOT_VERSION: SnapshotVersion = SnapshotVersion::new(1, 1);

/// First minor version carrying the register block.
const REGISTER_BLOCK_MINOR: u8 = 1;

pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot version {found} is newer than supported version {supported}")]
    FutureVersion {
        found: SnapshotVersion,
        supported: SnapshotVersion,
    },

    #[error("snapshot truncated at {0}")]
    Truncated(&'static str),

    #[error("invalid flag byte {value:#04x} for {field}")]
    InvalidFlag { field: &'static str, value: u8 },
}

/// Decoded snapshot record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortsState {
    pub version: SnapshotVersion,
    pub model: u8,
    pub output_bank: u8,
    pub alarm_active: bool,
    /// Register block, absent in minor 0 records.
    pub registers: Option<RegisterBlock>,
}

/// Port register contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBlock {
    pub pra: u8,
    pub prb: u8,
    pub ddra: u8,
    pub ddrb: u8,
    pub sampled_a: u8,
    pub sampled_b: u8,
}

impl PortsState {
    /// Capture the current chip state.
    pub fn capture(cia: &Cia1Ports) -> Self {
        let (a, b) = (cia.port_a(), cia.port_b());
        Self {
            version: SNAPSHOT_VERSION,
            model: cia.model().to_byte(),
            output_bank: cia.pot_mask(),
            alarm_active: cia.alarm_active(),
            registers: Some(RegisterBlock {
                pra: a.data(),
                prb: b.data(),
                ddra: a.ddr(),
                ddrb: b.ddr(),
                sampled_a: a.sampled(),
                sampled_b: b.sampled(),
            }),
        }
    }

    /// Encode to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(11);
        data.push(self.version.major);
        data.push(self.version.minor);
        data.push(self.model);
        data.push(self.output_bank);
        data.push(self.alarm_active as u8);
        if let Some(regs) = &self.registers {
            data.extend_from_slice(&[
                regs.pra,
                regs.prb,
                regs.ddra,
                regs.ddrb,
                regs.sampled_a,
                regs.sampled_b,
            ]);
        }
        data
    }

    /// Decode from bytes.
    pub fn deserialize(data: &[u8]) -> SnapshotResult<Self> {
        let mut pos = 0;

        let major = read_u8(data, &mut pos, "version")?;
        let minor = read_u8(data, &mut pos, "version")?;
        let version = SnapshotVersion::new(major, minor);
        if version > SNAPSHOT_VERSION {
            return Err(SnapshotError::FutureVersion {
                found: version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let model = read_u8(data, &mut pos, "model")?;
        let output_bank = read_u8(data, &mut pos, "output bank")?;
        let alarm_active = match read_u8(data, &mut pos, "alarm flag")? {
            0 => false,
            1 => true,
            value => {
                return Err(SnapshotError::InvalidFlag {
                    field: "alarm flag",
                    value,
                })
            }
        };

        let registers = if minor >= REGISTER_BLOCK_MINOR {
            Some(RegisterBlock {
                pra: read_u8(data, &mut pos, "registers")?,
                prb: read_u8(data, &mut pos, "registers")?,
                ddra: read_u8(data, &mut pos, "registers")?,
                ddrb: read_u8(data, &mut pos, "registers")?,
                sampled_a: read_u8(data, &mut pos, "registers")?,
                sampled_b: read_u8(data, &mut pos, "registers")?,
            })
        } else {
            None
        };

        Ok(Self {
            version,
            model,
            output_bank,
            alarm_active,
            registers,
        })
    }

    /// Apply to a chip. The configured model is kept; a differing model in
    /// the record is only logged. The restored paddle selection is pushed to
    /// `host`.
    pub fn restore<H: PortHost + ?Sized>(&self, cia: &mut Cia1Ports, host: &mut H) {
        match CiaModel::from_byte(self.model) {
            Some(model) if model == cia.model() => {}
            Some(model) => warn!(
                "CIA1 snapshot model {:?} differs from configured {:?}, keeping configured model",
                model,
                cia.model()
            ),
            None => warn!(
                "CIA1 snapshot has unknown model selector {}, keeping configured {:?}",
                self.model,
                cia.model()
            ),
        }

        cia.restore_bank(self.output_bank, self.alarm_active, host);

        if let Some(regs) = &self.registers {
            let mut port_a = PortRegisters::new();
            port_a.write_data(regs.pra);
            port_a.write_ddr(regs.ddra);
            port_a.set_sampled(regs.sampled_a);

            let mut port_b = PortRegisters::new();
            port_b.write_data(regs.prb);
            port_b.write_ddr(regs.ddrb);
            port_b.set_sampled(regs.sampled_b);

            cia.restore_ports(port_a, port_b);
        }
    }
}

/// Serialize the chip's port state.
pub fn save(cia: &Cia1Ports) -> Vec<u8> {
    PortsState::capture(cia).serialize()
}

/// Restore the chip's port state from `data`.
///
/// # Errors
///
/// Returns [`SnapshotError::FutureVersion`] for records newer than this
/// implementation, and [`SnapshotError::Truncated`] or
/// [`SnapshotError::InvalidFlag`] for malformed records. The chip is not
/// modified on error.
pub fn restore<H: PortHost + ?Sized>(
    cia: &mut Cia1Ports,
    data: &[u8],
    host: &mut H,
) -> SnapshotResult<()> {
    let state = PortsState::deserialize(data)?;
    state.restore(cia, host);
    Ok(())
}

fn read_u8(data: &[u8], pos: &mut usize, field: &'static str) -> SnapshotResult<u8> {
    let value = *data.get(*pos).ok_or(SnapshotError::Truncated(field))?;
    *pos += 1;
    Ok(value)
}
