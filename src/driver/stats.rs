//! Interface statistics
//!
//! [`Counters`] lives next to the rings and is bumped from both contexts.
//! Each counter has a single writer (TX counters: submission context for
//! `tx_dropped`, interrupt context for the rest; RX counters: interrupt
//! context), so relaxed ordering suffices. [`NicStats`] is the plain
//! snapshot handed to callers.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::dma::{RxReport, TxCompletion};

/// Point-in-time copy of the interface counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NicStats {
    /// Frames sent
    pub tx_packets: u64,
    /// Bytes sent
    pub tx_bytes: u64,
    /// Slots that failed (underrun or abort)
    pub tx_errors: u64,
    /// Frames refused before reaching the ring
    pub tx_dropped: u64,
    /// Slots the controller aborted
    pub tx_aborted: u64,
    /// Slots that hit a FIFO underrun
    pub tx_fifo_errors: u64,
    /// Frames delivered
    pub rx_packets: u64,
    /// Bytes delivered
    pub rx_bytes: u64,
    /// Bad records and RX error interrupts
    pub rx_errors: u64,
    /// RX buffer or FIFO overflows
    pub rx_fifo_errors: u64,
}

/// Live counters
#[derive(Debug, Default)]
pub struct Counters {
    tx_packets: AtomicU64,
    tx_bytes: AtomicU64,
    tx_errors: AtomicU64,
    tx_dropped: AtomicU64,
    tx_aborted: AtomicU64,
    tx_fifo_errors: AtomicU64,
    rx_packets: AtomicU64,
    rx_bytes: AtomicU64,
    rx_errors: AtomicU64,
    rx_fifo_errors: AtomicU64,
}

#[inline(always)]
fn bump(counter: &AtomicU64, n: u64) {
    if n != 0 {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

impl Counters {
    /// All zero
    pub const fn new() -> Self {
        Self {
            tx_packets: AtomicU64::new(0),
            tx_bytes: AtomicU64::new(0),
            tx_errors: AtomicU64::new(0),
            tx_dropped: AtomicU64::new(0),
            tx_aborted: AtomicU64::new(0),
            tx_fifo_errors: AtomicU64::new(0),
            rx_packets: AtomicU64::new(0),
            rx_bytes: AtomicU64::new(0),
            rx_errors: AtomicU64::new(0),
            rx_fifo_errors: AtomicU64::new(0),
        }
    }

    /// Fold in one TX reconcile pass
    pub fn record_tx(&self, done: &TxCompletion) {
        bump(&self.tx_packets, u64::from(done.packets));
        bump(&self.tx_bytes, done.bytes);
        bump(&self.tx_errors, u64::from(done.errors()));
        bump(&self.tx_aborted, u64::from(done.aborts));
        bump(&self.tx_fifo_errors, u64::from(done.underruns));
    }

    /// A frame refused at submission
    pub fn record_tx_dropped(&self) {
        bump(&self.tx_dropped, 1);
    }

    /// Fold in one RX drain pass
    pub fn record_rx(&self, report: &RxReport) {
        bump(&self.rx_packets, u64::from(report.packets));
        bump(&self.rx_bytes, report.bytes);
        bump(&self.rx_errors, u64::from(report.errors));
    }

    /// An `RER` interrupt
    pub fn record_rx_error(&self) {
        bump(&self.rx_errors, 1);
    }

    /// An `RXOVW` or `FOVW` interrupt
    pub fn record_rx_overflow(&self) {
        bump(&self.rx_fifo_errors, 1);
    }

    /// Copy every counter out
    pub fn snapshot(&self) -> NicStats {
        NicStats {
            tx_packets: self.tx_packets.load(Ordering::Relaxed),
            tx_bytes: self.tx_bytes.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
            tx_dropped: self.tx_dropped.load(Ordering::Relaxed),
            tx_aborted: self.tx_aborted.load(Ordering::Relaxed),
            tx_fifo_errors: self.tx_fifo_errors.load(Ordering::Relaxed),
            rx_packets: self.rx_packets.load(Ordering::Relaxed),
            rx_bytes: self.rx_bytes.load(Ordering::Relaxed),
            rx_errors: self.rx_errors.load(Ordering::Relaxed),
            rx_fifo_errors: self.rx_fifo_errors.load(Ordering::Relaxed),
        }
    }
}
