//! Centralized Constants
//!
//! Single source of truth for the frame, ring and timing numbers used across
//! the driver.
//!
//! # Organization
//!
//! - **Frame sizes**: Ethernet frame dimensions and the controller's limit
//! - **TX ring**: slot count and slot size
//! - **RX ring**: buffer size, guard pad and record layout
//! - **Timing**: reset polling and EEPROM clock settle times
//! - **EEPROM layout**: word addresses of factory data
//!
//! Register offsets and bit fields live in `internal::register::map`.

// =============================================================================
// Frame Sizes
// =============================================================================

/// Size of the memory-mapped register window
pub const REGISTER_WINDOW: usize = 0x100;

/// Largest frame the controller moves in one TX slot, FCS included
pub const MAX_ETH_SIZE: usize = 1792;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HLEN: usize = 14;

/// Frame check sequence appended to every frame
pub const ETH_FCS_LEN: usize = 4;

/// Minimum Ethernet frame length, FCS excluded
pub const ETH_ZLEN: usize = 60;

/// Hardware address length
pub const ETH_ALEN: usize = 6;

/// Largest MTU the controller can carry
pub const MAX_MTU: usize = MAX_ETH_SIZE - ETH_HLEN - ETH_FCS_LEN;

/// Standard Ethernet MTU
pub const DEFAULT_MTU: usize = 1500;

/// Smallest MTU an IPv4 host must accept
pub const MIN_MTU: usize = 68;

// =============================================================================
// TX Ring
// =============================================================================

/// Number of TX slots (one TSD/TSAD pair each)
pub const TX_RING_LEN: usize = 4;

/// Size of one TX slot
pub const TX_SLOT_SIZE: usize = MAX_ETH_SIZE;

/// Size of the TX DMA region
pub const TX_DMA_SIZE: usize = TX_RING_LEN * TX_SLOT_SIZE;

/// Default early TX threshold, in units of 32 bytes above 8 (104 bytes)
pub const DEFAULT_EARLY_TX_THRESHOLD: u8 = 3;

// =============================================================================
// RX Ring
// =============================================================================

/// Circular RX buffer length (RCR.RBLEN = 16K)
pub const RX_BUF_LEN: usize = 16 * 1024;

/// Guard pad after the circular RX buffer
pub const RX_PAD: usize = 16;

/// Size of the RX DMA region
pub const RX_DMA_SIZE: usize = RX_BUF_LEN + RX_PAD;

/// Per-record header (status + size)
pub const RX_HEADER_SIZE: usize = 4;

/// CAPR trails the consumer offset by this much
pub const RX_READ_POINTER_PAD: usize = 16;

/// Size field value while the controller is still writing the record
pub const RX_SIZE_UNFINISHED: u16 = 0xfff0;

// =============================================================================
// Timing
// =============================================================================

/// Maximum number of CR polls while waiting for a soft reset
pub const RESET_POLL_ITERATIONS: u32 = 1000;

/// Delay between reset polls in microseconds
pub const RESET_POLL_INTERVAL_US: u32 = 1;

/// Settle time for each EEPROM half clock in microseconds
pub const EEPROM_SETTLE_US: u32 = 1;

// =============================================================================
// EEPROM Layout
// =============================================================================

/// Word address of the factory MAC address (three consecutive words)
pub const EEPROM_MAC_WORD: u8 = 0x07;

/// Number of EEPROM words holding the MAC address
pub const EEPROM_MAC_WORDS: usize = ETH_ALEN / 2;

/// Rounds a byte count up to the next multiple of four.
#[inline(always)]
pub const fn align4(len: usize) -> usize {
    (len + 3) & !3
}
