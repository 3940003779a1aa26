//! Synchronization and Concurrency Support
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedNic`] - a driver context that can live in a `static` and be
//!   reached from both task code and the interrupt handler
//!
//! Requires the `critical-section` feature; the platform crate supplies the
//! implementation.
//!
//! # Example
//!
//! ```ignore
//! use rtl8139_core::sync::SharedNic;
//!
//! static NIC: SharedNic<Mmio, Dma, Irq> = SharedNic::new();
//!
//! fn bring_up(nic: Nic<Mmio, Dma, Irq>, delay: &mut impl DelayNs) {
//!     NIC.install(nic);
//!     NIC.with(|nic| nic.open(delay)).unwrap().unwrap();
//! }
//!
//! fn rtl8139_irq() -> IrqReturn {
//!     NIC.on_interrupt(StackHandle::get())
//! }
//! ```

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedNic;
