//! Configuration types for the RTL8139 driver core

use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::{DEFAULT_EARLY_TX_THRESHOLD, DEFAULT_MTU, MAX_MTU, MIN_MTU};
use crate::internal::register::map::{config1, int, rcr, tcr, tsd};

/// Largest value the 6-bit early TX threshold field holds
pub const MAX_EARLY_TX_THRESHOLD: u8 = 0x3f;

/// Interrupt sources enabled by default
pub const DEFAULT_INTERRUPTS: u16 =
    int::ROK | int::RER | int::TOK | int::TER | int::RXOVW | int::FOVW | int::LNKCHG_PUN;

/// Interframe gap (`TCR.IFG`), in bit times at 100 Mb/s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InterframeGap {
    /// 840 ns
    Ns840 = 0,
    /// 880 ns
    Ns880 = 1,
    /// 920 ns
    Ns920 = 2,
    /// 960 ns, the IEEE 802.3 value
    #[default]
    Ns960 = 3,
}

/// Maximum DMA burst per PCI transaction (`TCR.MXDMA`, `RCR.MXDMA`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DmaBurst {
    /// 16 bytes
    Bytes16 = 0,
    /// 32 bytes
    Bytes32 = 1,
    /// 64 bytes
    Bytes64 = 2,
    /// 128 bytes
    Bytes128 = 3,
    /// 256 bytes
    Bytes256 = 4,
    /// 512 bytes
    Bytes512 = 5,
    /// 1024 bytes
    #[default]
    Bytes1024 = 6,
    /// 2048 bytes on TX, unlimited on RX
    Max = 7,
}

impl DmaBurst {
    /// Encoded 3-bit field value
    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// LED function select (`CONFIG1.LEDS1:LEDS0`).
///
/// What each LED shows in each mode depends on the part; see the chip's
/// datasheet. Mode 0 is the power-on default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedMode {
    /// LEDS = 00
    #[default]
    Mode0 = 0,
    /// LEDS = 01
    Mode1 = 1,
    /// LEDS = 10
    Mode2 = 2,
    /// LEDS = 11
    Mode3 = 3,
}

impl LedMode {
    /// `CONFIG1` bits for this mode
    #[must_use]
    pub const fn config1_bits(self) -> u8 {
        ((self as u8) << config1::LEDS_SHIFT) & config1::LEDS_MASK
    }
}

/// `true` for a non-zero unicast address
#[must_use]
pub const fn is_valid_unicast(mac: &[u8; 6]) -> bool {
    let zero = mac[0] | mac[1] | mac[2] | mac[3] | mac[4] | mac[5] == 0;
    !zero && mac[0] & 0x01 == 0
}

/// Complete controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NicConfig {
    /// Bring the transmitter up on open
    pub tx_enabled: bool,
    /// Bring the receiver up on open
    pub rx_enabled: bool,
    /// Internal loopback (frames never reach the wire)
    pub loopback: bool,
    /// Interframe gap
    pub interframe_gap: InterframeGap,
    /// TX DMA burst
    pub tx_dma_burst: DmaBurst,
    /// RX DMA burst
    pub rx_dma_burst: DmaBurst,
    /// Early TX threshold: transmission starts once `8 + 32 * n` bytes are
    /// in the FIFO
    pub early_tx_threshold: u8,
    /// Accept broadcast frames
    pub accept_broadcast: bool,
    /// Accept all multicast frames
    pub accept_multicast: bool,
    /// Accept every frame regardless of destination
    pub promiscuous: bool,
    /// Interrupt sources written to `IMR`
    pub interrupts: u16,
    /// Station address; read from the EEPROM when `None`
    pub mac_address: Option<[u8; 6]>,
    /// MTU reported to the stack
    pub mtu: usize,
}

impl Default for NicConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl NicConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tx_enabled: true,
            rx_enabled: true,
            loopback: false,
            interframe_gap: InterframeGap::Ns960,
            tx_dma_burst: DmaBurst::Bytes1024,
            rx_dma_burst: DmaBurst::Bytes1024,
            early_tx_threshold: DEFAULT_EARLY_TX_THRESHOLD,
            accept_broadcast: true,
            accept_multicast: false,
            promiscuous: false,
            interrupts: DEFAULT_INTERRUPTS,
            mac_address: None,
            mtu: DEFAULT_MTU,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Enable or disable the transmitter
    #[must_use]
    pub const fn with_tx(mut self, enabled: bool) -> Self {
        self.tx_enabled = enabled;
        self
    }

    /// Enable or disable the receiver
    #[must_use]
    pub const fn with_rx(mut self, enabled: bool) -> Self {
        self.rx_enabled = enabled;
        self
    }

    /// Enable or disable internal loopback
    #[must_use]
    pub const fn with_loopback(mut self, enabled: bool) -> Self {
        self.loopback = enabled;
        self
    }

    /// Set the interframe gap
    #[must_use]
    pub const fn with_interframe_gap(mut self, gap: InterframeGap) -> Self {
        self.interframe_gap = gap;
        self
    }

    /// Set the TX DMA burst
    #[must_use]
    pub const fn with_tx_dma_burst(mut self, burst: DmaBurst) -> Self {
        self.tx_dma_burst = burst;
        self
    }

    /// Set the RX DMA burst
    #[must_use]
    pub const fn with_rx_dma_burst(mut self, burst: DmaBurst) -> Self {
        self.rx_dma_burst = burst;
        self
    }

    /// Set the early TX threshold (0..=63)
    #[must_use]
    pub const fn with_early_tx_threshold(mut self, threshold: u8) -> Self {
        self.early_tx_threshold = threshold;
        self
    }

    /// Accept or reject broadcast frames
    #[must_use]
    pub const fn with_broadcast(mut self, enabled: bool) -> Self {
        self.accept_broadcast = enabled;
        self
    }

    /// Accept or reject multicast frames
    #[must_use]
    pub const fn with_multicast(mut self, enabled: bool) -> Self {
        self.accept_multicast = enabled;
        self
    }

    /// Enable or disable promiscuous mode
    #[must_use]
    pub const fn with_promiscuous(mut self, enabled: bool) -> Self {
        self.promiscuous = enabled;
        self
    }

    /// Set the enabled interrupt sources
    #[must_use]
    pub const fn with_interrupts(mut self, mask: u16) -> Self {
        self.interrupts = mask;
        self
    }

    /// Use `addr` instead of the EEPROM address
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = Some(addr);
        self
    }

    /// Set the MTU
    #[must_use]
    pub const fn with_mtu(mut self, mtu: usize) -> Self {
        self.mtu = mtu;
        self
    }

    // =========================================================================
    // Validation and Register Values
    // =========================================================================

    /// Check the configuration for values the hardware cannot honour
    pub const fn validate(&self) -> ConfigResult<()> {
        if !self.tx_enabled && !self.rx_enabled {
            return Err(ConfigError::NothingEnabled);
        }
        if self.mtu < MIN_MTU || self.mtu > MAX_MTU {
            return Err(ConfigError::InvalidMtu);
        }
        if self.early_tx_threshold > MAX_EARLY_TX_THRESHOLD {
            return Err(ConfigError::InvalidEarlyTxThreshold);
        }
        if let Some(mac) = &self.mac_address {
            if !is_valid_unicast(mac) {
                return Err(ConfigError::InvalidMacAddress);
            }
        }
        Ok(())
    }

    /// Transmit configuration register value
    #[must_use]
    pub const fn tcr(&self) -> u32 {
        let mut val = (self.interframe_gap as u32) << tcr::IFG_SHIFT;
        val |= self.tx_dma_burst.bits() << tcr::MXDMA_SHIFT;
        if self.loopback {
            val |= tcr::LBK_ENABLE;
        }
        val
    }

    /// Receive configuration register value.
    ///
    /// Early RX is left off and `WRAP` clear, so records wrap inside the
    /// 16 KiB buffer.
    #[must_use]
    pub const fn rcr(&self) -> u32 {
        let mut val = (self.rx_dma_burst.bits() << rcr::MXDMA_SHIFT) | rcr::RBLEN_16K | rcr::APM;
        if self.accept_broadcast {
            val |= rcr::AB;
        }
        if self.accept_multicast {
            val |= rcr::AM;
        }
        if self.promiscuous {
            val |= rcr::AAP | rcr::AM | rcr::AB;
        }
        val
    }

    /// Flag bits written with every TSD frame length
    #[must_use]
    pub const fn tsd_flags(&self) -> u32 {
        ((self.early_tx_threshold as u32) << tsd::ERTXTH_SHIFT) & tsd::ERTXTH_MASK
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
