//! Chip configuration.

/// CIA revision fitted to the board.
///
/// The revision does not change port behavior; it is carried so snapshot
/// records can be checked against the configured chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CiaModel {
    /// Original MOS 6526 (C64 breadbin).
    #[default]
    Mos6526,
    /// MOS 6526A / 8521 (C64C).
    Mos8521,
}

impl CiaModel {
    /// Snapshot selector byte.
    pub fn to_byte(self) -> u8 {
        match self {
            CiaModel::Mos6526 => 0,
            CiaModel::Mos8521 => 1,
        }
    }

    /// Parse a snapshot selector byte.
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(CiaModel::Mos6526),
            1 => Some(CiaModel::Mos8521),
            _ => None,
        }
    }
}

/// Port core configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortsConfig {
    /// Chip revision.
    pub model: CiaModel,
}

impl PortsConfig {
    pub fn with_model(model: CiaModel) -> Self {
        Self { model }
    }
}
