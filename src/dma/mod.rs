//! DMA ring engines.
//!
//! - [`TxRing`]: four fixed transmit slots shared lock-free between the
//!   submit context (producer) and the interrupt context (consumer)
//! - [`RxRing`]: the 16 KiB circular receive buffer, drained by the
//!   interrupt context only
//!
//! Both rings own their [`DmaRegion`] and hand it back through
//! `into_region()` when the interface goes down.

pub mod rx;
pub mod tx;

pub use rx::{RxReport, RxRing};
pub use tx::{TxCompletion, TxRing, TxStatus};

use crate::driver::error::{DmaError, DmaResult};
use crate::hal::platform::DmaRegion;

/// Check that a freshly allocated region can back a ring of `len` bytes and
/// is reachable through the controller's 32-bit address registers.
///
/// Returns the 32-bit bus address on success.
pub(crate) fn check_region(region: &DmaRegion, len: usize) -> DmaResult<u32> {
    if region.len() < len {
        return Err(DmaError::BufferTooSmall);
    }
    let end = region
        .bus_addr()
        .checked_add(len as u64)
        .ok_or(DmaError::AddressOutOfRange)?;
    if end > 1u64 << 32 {
        return Err(DmaError::AddressOutOfRange);
    }
    Ok(region.bus_addr() as u32)
}
