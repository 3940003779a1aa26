//! RTL8139 Driver Core
//!
//! A `no_std`, `no_alloc` hardware core for the Realtek RTL8139 family of
//! PCI Fast Ethernet controllers (RTL8100B/8139D silicon).
//!
//! The crate drives the controller through its 256-byte register window and
//! two coherent DMA areas. Everything the surrounding system provides (the
//! register mapping, DMA memory, the interrupt line, a delay source and the
//! network stack) comes in through small traits, so the same core runs under
//! a kernel, a unikernel or a host-side test harness.
//!
//! # Architecture
//!
//! 1. **Driver** ([`driver`]): [`Nic`] lifecycle (probe, open, close),
//!    configuration, interrupt dispatch and counters
//! 2. **DMA** ([`dma`]): the four-slot TX ring and the 16 KiB RX ring
//! 3. **PHY** ([`phy`]): link and speed from the media status register
//! 4. **HAL** ([`hal`]): soft reset, the 93C46 EEPROM and platform traits
//!
//! Register access goes through [`RegisterIo`]; [`Mmio`] is the volatile
//! implementation for a mapped BAR.
//!
//! # Concurrency
//!
//! An open interface splits into a [`Transmitter`] (submission context) and
//! an [`IrqContext`] (interrupt context). The two share the TX ring without
//! locks: the submitter owns the CPU index, the interrupt path owns the
//! hardware index, and a stopped flag hands queue flow control back and
//! forth. The RX ring is only touched from the interrupt path.
//!
//! # Features
//!
//! - `defmt`: Log through `defmt` and derive `defmt::Format` on public types
//! - `log`: Log through the `log` facade
//! - `critical-section`: Enable the ISR-safe [`SharedNic`](sync::SharedNic)
//!   wrapper
//!
//! # Example
//!
//! ```ignore
//! use rtl8139_core::{Mmio, Nic, NicConfig, NetStack, TxStatus};
//! use rtl8139_core::constants::REGISTER_WINDOW;
//!
//! // SAFETY: BAR1 is mapped uncached for the whole register window
//! let regs = unsafe { Mmio::new(bar1_ptr, REGISTER_WINDOW)? };
//! let config = NicConfig::new().with_multicast(true);
//!
//! let mut nic = Nic::probe(regs, dma, irq, config, &mut delay)?;
//! nic.open(&mut delay)?;
//!
//! let (mut tx, mut irq_ctx) = nic.split(&mut stack)?;
//! if tx.submit(&frame)? == TxStatus::Full {
//!     // wait for NetStack::wake_queue()
//! }
//!
//! // from the interrupt handler
//! irq_ctx.on_interrupt();
//! ```
//!
//! # Memory Requirements
//!
//! - RX: 16 KiB ring plus 16 bytes of pad
//! - TX: 4 slots of 1792 bytes
//!
//! Both areas must sit below 4 GiB.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here and mirror the [lints] table in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// Logging shims; must come first so every module sees the macros
#[macro_use]
mod fmt;

// =============================================================================
// Modules
// =============================================================================

pub mod dma;
pub mod driver;
pub mod hal;
pub mod phy;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use dma::{RxReport, TxCompletion, TxStatus};
pub use driver::config::{DmaBurst, InterframeGap, LedMode, NicConfig};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result, TxError,
};
pub use driver::interrupt::{InterruptHandler, InterruptStatus, IrqContext, IrqReturn};
pub use driver::nic::{Nic, Transmitter};
pub use driver::stack::NetStack;
pub use driver::stats::NicStats;
pub use driver::version::ChipVersion;
pub use hal::platform::{DmaAllocator, DmaRegion, IrqLine};
pub use internal::register::{Mmio, RegisterIo};
pub use phy::{LinkEvent, LinkSpeed};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedNic};

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Frame sizes
        DEFAULT_MTU,
        ETH_ALEN,
        ETH_FCS_LEN,
        ETH_HLEN,
        ETH_ZLEN,
        MAX_ETH_SIZE,
        MAX_MTU,
        MIN_MTU,
        // Rings
        RX_BUF_LEN,
        RX_DMA_SIZE,
        TX_DMA_SIZE,
        TX_RING_LEN,
        TX_SLOT_SIZE,
        // Register window
        REGISTER_WINDOW,
    };
}
