//! Error types for the RTL8139 driver core
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Probe and configuration failures
//! - [`DmaError`]: DMA buffer acquisition failures
//! - [`IoError`]: Device and lifecycle failures (reset timeout, IRQ line)
//! - [`TxError`]: Frames the TX ring refused
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Probe and configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Mapped register window is smaller than the register file
    RegionTooSmall,
    /// Chip revision is not supported by this driver
    UnsupportedChip,
    /// MTU outside 68..=MAX_MTU
    InvalidMtu,
    /// MAC address is multicast or all zeros
    InvalidMacAddress,
    /// Early TX threshold does not fit the 6-bit TSD field
    InvalidEarlyTxThreshold,
    /// Neither transmitter nor receiver is enabled
    NothingEnabled,
    /// Interface is already open
    AlreadyOpen,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::RegionTooSmall => "register region too small",
            ConfigError::UnsupportedChip => "unsupported chip version",
            ConfigError::InvalidMtu => "invalid MTU",
            ConfigError::InvalidMacAddress => "invalid MAC address",
            ConfigError::InvalidEarlyTxThreshold => "invalid early TX threshold",
            ConfigError::NothingEnabled => "neither TX nor RX enabled",
            ConfigError::AlreadyOpen => "interface already open",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA buffer acquisition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// The allocator could not provide a coherent buffer
    AllocationFailed,
    /// The allocator returned a buffer shorter than requested
    BufferTooSmall,
    /// The bus address does not fit the controller's 32-bit address registers
    AddressOutOfRange,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::AllocationFailed => "DMA allocation failed",
            DmaError::BufferTooSmall => "DMA buffer too small",
            DmaError::AddressOutOfRange => "DMA address out of range",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Device and lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Soft reset did not complete within the polling budget
    Timeout,
    /// Operation requires an open interface
    NotOpen,
    /// The shared interrupt line could not be claimed
    IrqUnavailable,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::NotOpen => "interface not open",
            IoError::IrqUnavailable => "interrupt line unavailable",
        }
    }
}

// =============================================================================
// TX Errors
// =============================================================================

/// Reasons the TX ring refuses a frame.
///
/// Neither case changes ring state; the caller drops the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// Frame plus FCS exceeds the slot size
    Oversized,
    /// Zero-length frame
    Empty,
    /// No free slot; submission must wait for a resume signal
    RingFull,
}

impl core::fmt::Display for TxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TxError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TxError::Oversized => "frame too large",
            TxError::Empty => "empty frame",
            TxError::RingFull => "TX ring full",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::UnsupportedChip)) => { /* ... */ }
///     Err(Error::Dma(DmaError::AllocationFailed)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
    /// TX error
    Tx(TxError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
            Error::Tx(e) => write!(f, "tx: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<TxError> for Error {
    fn from(e: TxError) -> Self {
        Error::Tx(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;
