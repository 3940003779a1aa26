//! Interrupt handling for the RTL8139.
//!
//! [`InterruptStatus`] decodes the `ISR` register. [`IrqContext`] is the
//! interrupt-context half of an open interface: it acknowledges the
//! controller's status and fans the work out to the link monitor, the RX
//! drain and the TX reconcile.
//!
//! The line may be shared with other devices, so a zero `ISR` is reported
//! as [`IrqReturn::NotMine`] without touching anything.

use crate::dma::{RxRing, TxRing};
use crate::driver::stack::NetStack;
use crate::driver::stats::Counters;
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{ISR, int};
use crate::phy::link::LinkMonitor;

// =============================================================================
// Handler Contract
// =============================================================================

/// Answer to the platform's interrupt dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// The controller had nothing pending
    NotMine,
    /// The interrupt was ours and has been serviced
    Handled,
}

/// Anything the platform can call when the interrupt line fires.
///
/// `on_interrupt` must not block. The platform guarantees it is not
/// re-entered for the same device.
pub trait InterruptHandler {
    /// Service the interrupt
    fn on_interrupt(&mut self) -> IrqReturn;
}

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt status flags parsed from `ISR`.
///
/// # Example
///
/// ```ignore
/// let status = InterruptStatus::from_raw(regs.read16(ISR));
/// if status.rx_ok {
///     // drain the RX buffer
/// }
/// if status.has_error() {
///     // count it
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// RX OK - at least one good frame landed in the buffer
    pub rx_ok: bool,
    /// RX error - CRC or alignment error
    pub rx_error: bool,
    /// TX OK - a slot completed
    pub tx_ok: bool,
    /// TX error - a slot underran or was aborted
    pub tx_error: bool,
    /// RX buffer overflow
    pub rx_overflow: bool,
    /// Link change (or packet underrun)
    pub link_change: bool,
    /// RX FIFO overflow
    pub rx_fifo_overflow: bool,
    /// Cable length changed after RX was enabled
    pub length_change: bool,
    /// Timer expired
    pub timeout: bool,
    /// PCI bus error
    pub system_error: bool,
}

impl InterruptStatus {
    /// Create from a raw `ISR` value
    #[inline]
    pub fn from_raw(status: u16) -> Self {
        Self {
            rx_ok: (status & int::ROK) != 0,
            rx_error: (status & int::RER) != 0,
            tx_ok: (status & int::TOK) != 0,
            tx_error: (status & int::TER) != 0,
            rx_overflow: (status & int::RXOVW) != 0,
            link_change: (status & int::LNKCHG_PUN) != 0,
            rx_fifo_overflow: (status & int::FOVW) != 0,
            length_change: (status & int::LENCHG) != 0,
            timeout: (status & int::TIMEOUT) != 0,
            system_error: (status & int::SERR) != 0,
        }
    }

    /// Convert to raw value for acknowledging (write-1-to-clear)
    #[inline]
    pub fn to_raw(&self) -> u16 {
        let mut val = 0u16;
        if self.rx_ok {
            val |= int::ROK;
        }
        if self.rx_error {
            val |= int::RER;
        }
        if self.tx_ok {
            val |= int::TOK;
        }
        if self.tx_error {
            val |= int::TER;
        }
        if self.rx_overflow {
            val |= int::RXOVW;
        }
        if self.link_change {
            val |= int::LNKCHG_PUN;
        }
        if self.rx_fifo_overflow {
            val |= int::FOVW;
        }
        if self.length_change {
            val |= int::LENCHG;
        }
        if self.timeout {
            val |= int::TIMEOUT;
        }
        if self.system_error {
            val |= int::SERR;
        }
        val
    }

    /// Any event that means the RX buffer needs attention
    #[inline]
    pub fn rx_pending(&self) -> bool {
        self.rx_ok || self.rx_error || self.rx_overflow || self.rx_fifo_overflow
    }

    /// Any event that means a TX slot resolved
    #[inline]
    pub fn tx_pending(&self) -> bool {
        self.tx_ok || self.tx_error
    }

    /// Check if any error occurred
    #[inline]
    pub fn has_error(&self) -> bool {
        self.rx_error
            || self.tx_error
            || self.rx_overflow
            || self.rx_fifo_overflow
            || self.system_error
    }
}

// =============================================================================
// Interrupt Context
// =============================================================================

/// Interrupt-context view of an open interface.
///
/// Obtained from [`Nic::split`](crate::driver::nic::Nic::split). Owns the
/// RX consumer state and the link monitor outright and shares the TX ring
/// with the [`Transmitter`](crate::driver::nic::Transmitter).
#[derive(Debug)]
pub struct IrqContext<'a, R: RegisterIo, S: NetStack> {
    regs: &'a R,
    tx: &'a TxRing,
    rx: &'a mut RxRing,
    link: &'a mut LinkMonitor,
    counters: &'a Counters,
    enabled: u16,
    stack: S,
}

impl<'a, R: RegisterIo, S: NetStack> IrqContext<'a, R, S> {
    pub(crate) fn new(
        regs: &'a R,
        tx: &'a TxRing,
        rx: &'a mut RxRing,
        link: &'a mut LinkMonitor,
        counters: &'a Counters,
        enabled: u16,
        stack: S,
    ) -> Self {
        Self {
            regs,
            tx,
            rx,
            link,
            counters,
            enabled,
            stack,
        }
    }

    /// The stack events are delivered to
    pub fn stack(&mut self) -> &mut S {
        &mut self.stack
    }

    /// Interrupt sources this context acts on
    pub fn enabled(&self) -> u16 {
        self.enabled
    }
}

impl<R: RegisterIo, S: NetStack> InterruptHandler for IrqContext<'_, R, S> {
    fn on_interrupt(&mut self) -> IrqReturn {
        let raw = self.regs.read16(ISR);
        if raw == 0 {
            return IrqReturn::NotMine;
        }

        // acknowledge first so events arriving during the work re-raise
        self.regs.write16(ISR, raw);

        let ignored = raw & !self.enabled;
        if ignored != 0 {
            debug!("ignoring masked interrupt bits {:#06x}", ignored);
        }
        let status = InterruptStatus::from_raw(raw & self.enabled);
        trace!("ISR {:#06x}", raw);

        if status.system_error {
            error!("PCI system error");
        }

        if status.link_change
            && let Some(event) = self.link.check(self.regs)
        {
            self.stack.link_changed(event);
        }

        if status.rx_pending() {
            if status.rx_overflow || status.rx_fifo_overflow {
                warn!("RX overflow");
                self.counters.record_rx_overflow();
            }
            if status.rx_error {
                self.counters.record_rx_error();
            }
            let report = self.rx.drain(self.regs, &mut self.stack);
            self.counters.record_rx(&report);
        }

        if status.tx_pending() {
            let done = self.tx.reconcile(self.regs);
            self.counters.record_tx(&done);
            if done.resume {
                self.stack.wake_queue();
            }
        }

        IrqReturn::Handled
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
