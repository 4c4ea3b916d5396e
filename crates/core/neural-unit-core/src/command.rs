//! Command registry shared by every domain component
//!
//! Each command belongs to exactly one [`Domain`]. Its opcode is the domain's
//! base byte OR a 4-bit offset, so drive commands always land in `0x2X`,
//! memory commands in `0x3X` and personality commands in `0x4X`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed payload carried by destructive commands (`MEM_WIPE`, `TRAIT_RESET`)
pub const DESTRUCTIVE_SENTINEL: [u8; 2] = [0xDE, 0xAD];

/// Command family on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Behavioral drives
    Drive,
    /// Episodic and semantic memory
    Memory,
    /// Personality traits
    Personality,
}

impl Domain {
    /// High nibble shared by every opcode in this domain
    pub const fn base(self) -> u8 {
        match self {
            Domain::Drive => 0x20,
            Domain::Memory => 0x30,
            Domain::Personality => 0x40,
        }
    }

    /// Domain owning an opcode, judged by its high nibble
    pub const fn of_opcode(opcode: u8) -> Option<Domain> {
        match opcode & 0xF0 {
            0x20 => Some(Domain::Drive),
            0x30 => Some(Domain::Memory),
            0x40 => Some(Domain::Personality),
            _ => None,
        }
    }
}

/// Every command the host can issue (firmware protocol v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Write one drive weight
    SetDrive,
    /// Read one drive weight
    GetDrive,
    /// Read every drive weight
    ListDrives,
    /// Append one episodic record
    Encode,
    /// Read the most recent episodic records
    Recall,
    /// Read the trust score for a subject hash
    Trust,
    /// Erase episodic and semantic memory
    MemWipe,
    /// Read one trait
    TraitGet,
    /// Write one trait
    TraitSet,
    /// Read every trait
    TraitSnapshot,
    /// Restore factory traits
    TraitReset,
}

impl Command {
    /// All commands in opcode order
    pub const ALL: [Command; 11] = [
        Command::SetDrive,
        Command::GetDrive,
        Command::ListDrives,
        Command::Encode,
        Command::Recall,
        Command::Trust,
        Command::MemWipe,
        Command::TraitGet,
        Command::TraitSet,
        Command::TraitSnapshot,
        Command::TraitReset,
    ];

    /// Domain this command belongs to
    pub const fn domain(self) -> Domain {
        match self {
            Command::SetDrive | Command::GetDrive | Command::ListDrives => Domain::Drive,
            Command::Encode | Command::Recall | Command::Trust | Command::MemWipe => {
                Domain::Memory
            }
            Command::TraitGet
            | Command::TraitSet
            | Command::TraitSnapshot
            | Command::TraitReset => Domain::Personality,
        }
    }

    /// Position within the domain (low nibble)
    const fn offset(self) -> u8 {
        match self {
            Command::SetDrive => 0x0,
            Command::GetDrive => 0x1,
            Command::ListDrives => 0x2,
            Command::Encode => 0x0,
            Command::Recall => 0x1,
            Command::Trust => 0x2,
            Command::MemWipe => 0xF,
            Command::TraitGet => 0x0,
            Command::TraitSet => 0x1,
            Command::TraitSnapshot => 0x2,
            Command::TraitReset => 0xF,
        }
    }

    /// Wire opcode
    pub const fn opcode(self) -> u8 {
        self.domain().base() | (self.offset() & 0x0F)
    }

    /// Look up a command by its wire opcode
    pub fn from_opcode(opcode: u8) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.opcode() == opcode)
    }

    /// Whether the command irreversibly erases device state
    pub const fn is_destructive(self) -> bool {
        matches!(self, Command::MemWipe | Command::TraitReset)
    }

    /// Protocol name as used in firmware documentation
    pub const fn name(self) -> &'static str {
        match self {
            Command::SetDrive => "SET_DRIVE",
            Command::GetDrive => "GET_DRIVE",
            Command::ListDrives => "LIST_DRIVES",
            Command::Encode => "ENCODE",
            Command::Recall => "RECALL",
            Command::Trust => "TRUST",
            Command::MemWipe => "MEM_WIPE",
            Command::TraitGet => "TRAIT_GET",
            Command::TraitSet => "TRAIT_SET",
            Command::TraitSnapshot => "TRAIT_SNAPSHOT",
            Command::TraitReset => "TRAIT_RESET",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.opcode())
    }
}
