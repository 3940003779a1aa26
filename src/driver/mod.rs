//! Core driver components for RTL8139-family controllers.
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`nic`] - The driver context and its lifecycle
//! - [`interrupt`] - Interrupt decoding and dispatch
//! - [`stack`] - Upcalls into the network stack
//! - [`stats`] - Interface counters
//! - [`version`] - Chip revision decoding
//!
//! # Example
//!
//! ```ignore
//! use rtl8139_core::driver::{NicConfig, Nic, Error};
//!
//! let config = NicConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod interrupt;
pub mod nic;
pub mod stack;
pub mod stats;
pub mod version;

// Re-exports for convenience
pub use config::{
    DEFAULT_INTERRUPTS, DmaBurst, InterframeGap, LedMode, MAX_EARLY_TX_THRESHOLD, NicConfig,
    is_valid_unicast,
};
pub use error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result, TxError,
};
pub use interrupt::{InterruptHandler, InterruptStatus, IrqContext, IrqReturn};
pub use nic::{Nic, Transmitter};
pub use stack::NetStack;
pub use stats::{Counters, NicStats};
pub use version::ChipVersion;
