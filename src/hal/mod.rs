//! Hardware Abstraction Layer
//!
//! Higher-level sequences built on the raw register capability, plus the
//! traits the platform implements for the driver.
//!
//! # Modules
//!
//! - [`platform`]: DMA allocation and interrupt line traits
//! - [`reset`]: Soft-reset sequencing
//! - [`eeprom`]: 93C46 serial EEPROM reader
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod eeprom;
pub mod platform;
pub mod reset;

// Re-export commonly used types
pub use eeprom::EepromReader;
pub use platform::{DmaAllocator, DmaRegion, IrqLine};
pub use reset::ResetSequencer;
