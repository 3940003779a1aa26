//! RTL8139 register map.
//!
//! Byte offsets into the 256-byte register window and the bit fields of the
//! registers the driver touches. All multi-byte registers are little-endian.

// =============================================================================
// Register Offsets
// =============================================================================

/// ID registers 0-3 (MAC bytes 0..4), 32-bit access only
pub const IDR0: usize = 0x00;
/// ID registers 4-5 (MAC bytes 4..6) plus two reserved bytes
pub const IDR4: usize = 0x04;
/// TX status of descriptor 0
pub const TSD0: usize = 0x10;
/// Stride between TSD registers
pub const TSD_GAP: usize = 4;
/// TX start address of descriptor 0
pub const TSAD0: usize = 0x20;
/// Stride between TSAD registers
pub const TSAD_GAP: usize = 4;
/// RX buffer start address
pub const RBSTART: usize = 0x30;
/// Command register (8-bit)
pub const CR: usize = 0x37;
/// Current address of packet read (16-bit)
pub const CAPR: usize = 0x38;
/// Current buffer address, the hardware write pointer (16-bit)
pub const CBR: usize = 0x3a;
/// Interrupt mask register (16-bit)
pub const IMR: usize = 0x3c;
/// Interrupt status register (16-bit, write 1 to clear)
pub const ISR: usize = 0x3e;
/// TX configuration register
pub const TCR: usize = 0x40;
/// RX configuration register
pub const RCR: usize = 0x44;
/// Missed packet counter
pub const MPC: usize = 0x4c;
/// 93C46 command register (8-bit)
pub const EE_CR: usize = 0x50;
/// Configuration register 1 (8-bit, write protected)
pub const CONFIG1: usize = 0x52;
/// Media status register (8-bit)
pub const MSR: usize = 0x58;
/// Multiple interrupt select (16-bit)
pub const MULINT: usize = 0x5c;
/// TSD summary of all descriptors (16-bit)
pub const TSAD: usize = 0x60;

/// Offset of the TSD register for `slot`.
#[inline(always)]
pub const fn tsd(slot: usize) -> usize {
    TSD0 + slot * TSD_GAP
}

/// Offset of the TSAD register for `slot`.
#[inline(always)]
pub const fn tsad(slot: usize) -> usize {
    TSAD0 + slot * TSAD_GAP
}

// =============================================================================
// Command Register (CR)
// =============================================================================

/// Command register bits
pub mod cr {
    /// Software reset, self-clearing
    pub const RST: u8 = 1 << 4;
    /// Receiver enable
    pub const RE: u8 = 1 << 3;
    /// Transmitter enable
    pub const TE: u8 = 1 << 2;
    /// RX buffer empty (read-only)
    pub const BUFE: u8 = 1 << 0;
}

// =============================================================================
// Interrupt Mask / Status (IMR, ISR)
// =============================================================================

/// Interrupt bits, shared by IMR and ISR
pub mod int {
    /// System error on the PCI bus
    pub const SERR: u16 = 1 << 15;
    /// Timer expired
    pub const TIMEOUT: u16 = 1 << 14;
    /// Cable length changed after RX was enabled
    pub const LENCHG: u16 = 1 << 13;
    /// RX FIFO overflow
    pub const FOVW: u16 = 1 << 6;
    /// Link change / RX packet underrun
    pub const LNKCHG_PUN: u16 = 1 << 5;
    /// RX buffer overflow
    pub const RXOVW: u16 = 1 << 4;
    /// TX error (underrun or abort)
    pub const TER: u16 = 1 << 3;
    /// TX OK
    pub const TOK: u16 = 1 << 2;
    /// RX error (CRC or alignment)
    pub const RER: u16 = 1 << 1;
    /// RX OK
    pub const ROK: u16 = 1 << 0;
    /// Every bit, used to acknowledge everything at once
    pub const CLEAR: u16 = 0xffff;

    /// Bits that mean the RX buffer has something to look at
    pub const RX_EVENTS: u16 = ROK | RER | RXOVW | FOVW;
    /// Bits that mean a TX slot finished
    pub const TX_EVENTS: u16 = TOK | TER;
}

// =============================================================================
// TX Status of Descriptor (TSD0-3)
// =============================================================================

/// TX status register bits
pub mod tsd {
    /// Carrier sense lost
    pub const CRS: u32 = 1 << 31;
    /// Transmit abort
    pub const TABT: u32 = 1 << 30;
    /// Out of window collision
    pub const OWC: u32 = 1 << 29;
    /// CD heart beat
    pub const CDH: u32 = 1 << 28;
    /// Collision count
    pub const NCC_MASK: u32 = 0xf << 24;
    /// Early TX threshold field position
    pub const ERTXTH_SHIFT: u32 = 16;
    /// Early TX threshold field
    pub const ERTXTH_MASK: u32 = 0x3f << ERTXTH_SHIFT;
    /// Transmit OK
    pub const TOK: u32 = 1 << 15;
    /// Transmit FIFO underrun
    pub const TUN: u32 = 1 << 14;
    /// Owned by the driver again once the DMA copy completes
    pub const OWN: u32 = 1 << 13;
    /// Frame size field
    pub const SIZE_MASK: u32 = 0x1fff;

    /// A slot is resolved once any of these is set
    pub const DONE: u32 = TOK | TUN | TABT;
}

// =============================================================================
// TX Configuration (TCR)
// =============================================================================

/// TX configuration register fields
pub mod tcr {
    /// Hardware version bits
    pub const HWVERID_MASK: u32 = 0x7cc0_0000;
    /// Interframe gap field position
    pub const IFG_SHIFT: u32 = 24;
    /// Loopback field position
    pub const LBK_SHIFT: u32 = 17;
    /// Internal loopback
    pub const LBK_ENABLE: u32 = 3 << LBK_SHIFT;
    /// Do not append CRC
    pub const CRC: u32 = 1 << 16;
    /// Max DMA burst field position
    pub const MXDMA_SHIFT: u32 = 8;
}

// =============================================================================
// RX Configuration (RCR)
// =============================================================================

/// RX configuration register fields
pub mod rcr {
    /// Early RX threshold field position
    pub const ERTH_SHIFT: u32 = 24;
    /// Multiple early interrupt select
    pub const MUL_ER_INT: u32 = 1 << 17;
    /// Receive frames of 8 bytes or more
    pub const RER8: u32 = 1 << 16;
    /// RX FIFO threshold field position
    pub const RXFTH_SHIFT: u32 = 13;
    /// RX buffer length field position
    pub const RBLEN_SHIFT: u32 = 11;
    /// 16K + 16 byte RX buffer
    pub const RBLEN_16K: u32 = 1 << RBLEN_SHIFT;
    /// Max DMA burst field position
    pub const MXDMA_SHIFT: u32 = 8;
    /// Let the controller overflow past the end instead of wrapping
    pub const WRAP: u32 = 1 << 7;
    /// Accept error frames
    pub const AER: u32 = 1 << 5;
    /// Accept runt frames
    pub const AR: u32 = 1 << 4;
    /// Accept broadcast frames
    pub const AB: u32 = 1 << 3;
    /// Accept multicast frames
    pub const AM: u32 = 1 << 2;
    /// Accept frames for our physical address
    pub const APM: u32 = 1 << 1;
    /// Accept all frames
    pub const AAP: u32 = 1 << 0;
}

// =============================================================================
// RX Record Status
// =============================================================================

/// Status word at the front of every RX record
pub mod rx_status {
    /// Multicast address received
    pub const MAR: u16 = 1 << 15;
    /// Physical address matched
    pub const PAM: u16 = 1 << 14;
    /// Broadcast address received
    pub const BAR: u16 = 1 << 13;
    /// Invalid symbol error
    pub const ISE: u16 = 1 << 5;
    /// Runt packet
    pub const RUNT: u16 = 1 << 4;
    /// Long packet
    pub const LONG: u16 = 1 << 3;
    /// CRC error
    pub const CRC: u16 = 1 << 2;
    /// Frame alignment error
    pub const FAE: u16 = 1 << 1;
    /// Receive OK
    pub const ROK: u16 = 1 << 0;
}

// =============================================================================
// 93C46 Command Register (EE_CR)
// =============================================================================

/// EEPROM command register bits and the 93C46 read command
pub mod ee {
    /// Normal operating mode
    pub const NORMAL: u8 = 0x00;
    /// Reload configuration from the EEPROM
    pub const AUTO_LOAD: u8 = 0x40;
    /// Pins EECS/EESK/EEDI/EEDO are driven by the CPU
    pub const PROGRAM: u8 = 0x80;
    /// Unlock IDR0-5 and CONFIG registers for writing
    pub const CFG_WRITE_ENABLE: u8 = 0xc0;
    /// Chip select
    pub const EECS: u8 = 1 << 3;
    /// Serial clock
    pub const EESK: u8 = 1 << 2;
    /// Data in (to the EEPROM)
    pub const EEDI: u8 = 1 << 1;
    /// Data out (from the EEPROM)
    pub const EEDO: u8 = 1 << 0;

    /// Read opcode including the start bit
    pub const CMD_READ: u16 = 0b110;
    /// Opcode length in bits
    pub const OPCODE_LEN: u32 = 3;
    /// Address length of a 64 x 16 bit part
    pub const ADDR_LEN: u32 = 6;
    /// Total command length
    pub const CMD_LEN: u32 = OPCODE_LEN + ADDR_LEN;
    /// Address mask
    pub const ADDR_MASK: u8 = (1 << ADDR_LEN) - 1;
    /// Response length in bits
    pub const WORD_LEN: u32 = 16;
}

// =============================================================================
// CONFIG1
// =============================================================================

/// Configuration register 1 bits
pub mod config1 {
    /// LED function select (LEDS1:LEDS0)
    pub const LEDS_MASK: u8 = 0xc0;
    /// LED field position
    pub const LEDS_SHIFT: u32 = 6;
}

// =============================================================================
// Media Status (MSR)
// =============================================================================

/// Media status register bits
pub mod msr {
    /// TX flow control enable
    pub const TXFCE: u8 = 1 << 7;
    /// RX flow control enable
    pub const RXFCE: u8 = 1 << 6;
    /// Auxiliary power present
    pub const AUX_STATUS: u8 = 1 << 4;
    /// 1: 10 Mb/s, 0: 100 Mb/s
    pub const SPD_10: u8 = 1 << 3;
    /// 1: link fail, 0: link ok
    pub const LINK_BAD: u8 = 1 << 2;
    /// Pause packet sent
    pub const TXPF: u8 = 1 << 1;
    /// Backoff because a pause packet was received
    pub const RXPF: u8 = 1 << 0;
}
