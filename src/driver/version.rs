//! Chip revision decoding
//!
//! The hardware version sits in `TCR` bits 30:26 and 23:22.

use core::fmt;

use crate::internal::register::map::tcr;

const B30: u32 = 1 << 30;
const B29: u32 = 1 << 29;
const B28: u32 = 1 << 28;
const B27: u32 = 1 << 27;
const B26: u32 = 1 << 26;
const B23: u32 = 1 << 23;
const B22: u32 = 1 << 22;

/// Chip family reported by `TCR.HWVERID`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipVersion {
    /// RTL8139
    Rtl8139,
    /// RTL8139A
    Rtl8139A,
    /// RTL8139A-G or RTL8139C
    Rtl8139AgC,
    /// RTL8139B or RTL8130
    Rtl8139B8130,
    /// RTL8100
    Rtl8100,
    /// RTL8100B or RTL8139D
    Rtl8100B8139D,
    /// RTL8139C+
    Rtl8139CPlus,
    /// RTL8101
    Rtl8101,
    /// Anything else; carries the masked bits
    Unknown(u32),
}

impl ChipVersion {
    /// Decode from a raw `TCR` value (non-version bits are ignored)
    pub const fn from_tcr(tcr_val: u32) -> Self {
        match tcr_val & tcr::HWVERID_MASK {
            v if v == B30 | B29 => ChipVersion::Rtl8139,
            v if v == B30 | B29 | B28 => ChipVersion::Rtl8139A,
            v if v == B30 | B29 | B28 | B26 => ChipVersion::Rtl8139AgC,
            v if v == B30 | B29 | B28 | B27 => ChipVersion::Rtl8139B8130,
            v if v == B30 | B29 | B28 | B27 | B23 => ChipVersion::Rtl8100,
            v if v == B30 | B29 | B28 | B26 | B22 => ChipVersion::Rtl8100B8139D,
            v if v == B30 | B29 | B28 | B26 | B23 => ChipVersion::Rtl8139CPlus,
            v if v == B30 | B29 | B28 | B26 | B23 | B22 => ChipVersion::Rtl8101,
            v => ChipVersion::Unknown(v),
        }
    }

    /// Marketing name
    pub const fn name(self) -> &'static str {
        match self {
            ChipVersion::Rtl8139 => "RTL8139",
            ChipVersion::Rtl8139A => "RTL8139A",
            ChipVersion::Rtl8139AgC => "RTL8139AG/8139C",
            ChipVersion::Rtl8139B8130 => "RTL8139B/8130",
            ChipVersion::Rtl8100 => "RTL8100",
            ChipVersion::Rtl8100B8139D => "RTL8100B/8139D",
            ChipVersion::Rtl8139CPlus => "RTL8139C+",
            ChipVersion::Rtl8101 => "RTL8101",
            ChipVersion::Unknown(_) => "Unknown",
        }
    }

    /// Only the RTL8100B/8139D has been brought up with this driver
    pub const fn is_supported(self) -> bool {
        matches!(self, ChipVersion::Rtl8100B8139D)
    }
}

impl fmt::Display for ChipVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
