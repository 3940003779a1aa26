//! Transmit ring.
//!
//! Four fixed slots of [`MAX_ETH_SIZE`] bytes, one per TSD/TSAD register
//! pair. Two indices govern them:
//!
//! - `cpu`: next slot to fill, written only by `submit`
//! - `hw`: oldest slot the hardware has not resolved, written only by
//!   `reconcile`
//!
//! The ring is empty when `cpu == hw` and full when `(hw - cpu) & MASK == 1`.
//! One slot always stays unused so the two states never look alike.
//!
//! # Memory Ordering
//!
//! Producer:
//! 1. Copy the frame into slot `cpu`, then write its TSD (arms the DMA)
//! 2. Store `cpu + 1` with Release
//!
//! Consumer:
//! 1. Load `cpu` with Acquire (sees every armed slot before it)
//! 2. Read TSD of slot `hw`, resolve it
//! 3. Store `hw + 1` with Release (the producer may reuse the slot)
//!
//! `submit` and `reconcile` are crate-private. The only way to reach them from
//! outside is [`Nic::split`](crate::driver::nic::Nic::split), whose
//! `Transmitter` and `IrqContext` each need `&mut self` to act, so there is
//! exactly one producer and one consumer per open interface.
//!
//! The queue-stopped flag uses a store / fence / re-check handshake on both
//! sides so a completion racing a `Full` report always yields a resume.

use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering, fence};

use crate::driver::error::TxError;
use crate::hal::platform::DmaRegion;
use crate::internal::constants::{
    ETH_FCS_LEN, ETH_ZLEN, MAX_ETH_SIZE, TX_DMA_SIZE, TX_RING_LEN, TX_SLOT_SIZE,
};
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{ISR, int, tsad, tsd};

// =============================================================================
// Results
// =============================================================================

/// Outcome of a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxStatus {
    /// Frame armed, more slots free
    Queued,
    /// Frame armed and the ring is now full; stop submitting until the
    /// completion path signals resume
    Full,
}

/// What one TX reconcile pass resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxCompletion {
    /// Slots sent successfully
    pub packets: u32,
    /// Bytes sent (TSD size field of each successful slot)
    pub bytes: u64,
    /// Slots that failed with a FIFO underrun
    pub underruns: u32,
    /// Slots the controller aborted
    pub aborts: u32,
    /// The ring had been reported full and now has room
    pub resume: bool,
}

impl TxCompletion {
    /// Failed slots of either kind
    #[inline]
    pub fn errors(&self) -> u32 {
        self.underruns + self.aborts
    }
}

// =============================================================================
// TX Ring
// =============================================================================

/// Lock-free transmit ring.
///
/// `submit` must only be called from one context at a time, and likewise
/// `reconcile`. The two may run concurrently with each other.
#[derive(Debug)]
pub struct TxRing {
    region: DmaRegion,
    /// TSD bits OR'd into every frame length
    flags: u32,
    cpu: AtomicUsize,
    hw: AtomicUsize,
    stopped: AtomicBool,
}

impl TxRing {
    /// Number of slots
    pub const LEN: usize = TX_RING_LEN;

    /// Bit mask for wrapping indices
    const MASK: usize = TX_RING_LEN - 1;

    /// Build a ring over `region`, which must hold [`TX_DMA_SIZE`] bytes
    /// below 4 GiB (see `dma::check_region`).
    ///
    /// `flags` come from [`NicConfig::tsd_flags`](crate::driver::config::NicConfig::tsd_flags).
    pub fn new(region: DmaRegion, flags: u32) -> Self {
        debug_assert!(region.len() >= TX_DMA_SIZE);
        Self {
            region,
            flags,
            cpu: AtomicUsize::new(0),
            hw: AtomicUsize::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    /// Give the DMA region back
    pub fn into_region(self) -> DmaRegion {
        self.region
    }

    /// Device address of `slot`
    pub fn slot_bus_addr(&self, slot: usize) -> u32 {
        (self.region.bus_addr() + (slot * TX_SLOT_SIZE) as u64) as u32
    }

    /// Point each TSAD register at its slot
    pub fn program<R: RegisterIo>(&self, regs: &R) {
        for slot in 0..Self::LEN {
            regs.write32(tsad(slot), self.slot_bus_addr(slot));
        }
    }

    /// Zero both indices. Only valid after a successful controller reset,
    /// which rewinds the hardware's own slot pointer.
    pub fn reset_indices(&self) {
        self.cpu.store(0, Ordering::Release);
        self.hw.store(0, Ordering::Release);
        self.stopped.store(false, Ordering::Release);
    }

    /// Current `(cpu, hw)` pair
    pub fn indices(&self) -> (usize, usize) {
        (
            self.cpu.load(Ordering::Acquire),
            self.hw.load(Ordering::Acquire),
        )
    }

    /// Number of armed, unresolved slots
    pub fn in_flight(&self) -> usize {
        let (cpu, hw) = self.indices();
        cpu.wrapping_sub(hw) & Self::MASK
    }

    /// No armed slots
    pub fn is_empty(&self) -> bool {
        let (cpu, hw) = self.indices();
        cpu == hw
    }

    /// No free slot
    pub fn is_full(&self) -> bool {
        let (cpu, hw) = self.indices();
        Self::full(cpu, hw)
    }

    /// A `Full` report is waiting for a resume
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn full(cpu: usize, hw: usize) -> bool {
        hw.wrapping_sub(cpu) & Self::MASK == 1
    }

    #[inline(always)]
    fn slot_ptr(&self, slot: usize) -> *mut u8 {
        self.region.as_ptr().wrapping_add(slot * TX_SLOT_SIZE)
    }

    // =========================================================================
    // Producer
    // =========================================================================

    /// Copy `frame` into the next slot and arm it.
    ///
    /// Frames shorter than [`ETH_ZLEN`] are zero padded; the controller does
    /// not pad. The FCS is appended by hardware.
    ///
    /// # Errors
    ///
    /// - [`TxError::Empty`] for a zero-length frame
    /// - [`TxError::Oversized`] when `frame.len() + FCS > MAX_ETH_SIZE`
    /// - [`TxError::RingFull`] when called after a `Full` report without an
    ///   intervening resume
    ///
    /// None of these touch ring state.
    pub(crate) fn submit<R: RegisterIo>(&self, regs: &R, frame: &[u8]) -> Result<TxStatus, TxError> {
        let len = frame.len();
        if len == 0 {
            return Err(TxError::Empty);
        }
        if len + ETH_FCS_LEN > MAX_ETH_SIZE {
            return Err(TxError::Oversized);
        }

        let cpu = self.cpu.load(Ordering::Relaxed);
        if Self::full(cpu, self.hw.load(Ordering::Acquire)) {
            return Err(TxError::RingFull);
        }

        let slot = self.slot_ptr(cpu);
        // SAFETY: slot `cpu` lies outside [hw, cpu), so the hardware is not
        // reading it and the consumer never touches slot memory. Both writes
        // stay within the slot (len + FCS <= TX_SLOT_SIZE, ETH_ZLEN < slot).
        unsafe {
            if len < ETH_ZLEN {
                ptr::write_bytes(slot.add(len), 0, ETH_ZLEN - len);
            }
            ptr::copy_nonoverlapping(frame.as_ptr(), slot, len);
        }
        let wire_len = len.max(ETH_ZLEN) as u32;

        // slot contents must be visible before the doorbell
        fence(Ordering::Release);
        regs.write32(tsd(cpu), self.flags | wire_len);

        let next = (cpu + 1) & Self::MASK;
        self.cpu.store(next, Ordering::Release);

        if !Self::full(next, self.hw.load(Ordering::Acquire)) {
            return Ok(TxStatus::Queued);
        }

        self.stopped.store(true, Ordering::Relaxed);
        fence(Ordering::SeqCst);
        if Self::full(next, self.hw.load(Ordering::Relaxed)) {
            trace!("TX ring full, stopping queue");
            return Ok(TxStatus::Full);
        }

        // a completion freed a slot between the two checks
        self.stopped.store(false, Ordering::Relaxed);
        Ok(TxStatus::Queued)
    }

    // =========================================================================
    // Consumer
    // =========================================================================

    /// Resolve finished slots in order.
    ///
    /// Stops at the first slot with none of TOK/TUN/TABT set; later slots
    /// are never looked at before it resolves. Each failed slot re-acks
    /// `ISR.TER`, which the controller may raise again while slots drain.
    pub(crate) fn reconcile<R: RegisterIo>(&self, regs: &R) -> TxCompletion {
        let cpu = self.cpu.load(Ordering::Acquire);
        let start = self.hw.load(Ordering::Relaxed);
        let mut hw = start;
        let mut done = TxCompletion::default();

        while hw != cpu {
            let status = regs.read32(tsd(hw));
            if status & tsd::DONE == 0 {
                break;
            }

            if status & tsd::TOK != 0 {
                done.packets += 1;
                done.bytes += u64::from(status & tsd::SIZE_MASK);
            } else {
                if status & tsd::TUN != 0 {
                    done.underruns += 1;
                    warn!("TX underrun on slot {} (tsd {:#010x})", hw, status);
                } else {
                    done.aborts += 1;
                    warn!("TX aborted on slot {} (tsd {:#010x})", hw, status);
                }
                regs.write16(ISR, int::TER);
            }

            hw = (hw + 1) & Self::MASK;
            self.hw.store(hw, Ordering::Release);
        }

        if hw != start {
            fence(Ordering::SeqCst);
            done.resume = self.stopped.swap(false, Ordering::AcqRel);
        }
        done
    }
}

// SAFETY: slot memory is written only by the single producer, for slots the
// consumer has already released; the indices and the stopped flag are atomics.
unsafe impl Sync for TxRing {}
