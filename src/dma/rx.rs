//! Receive ring.
//!
//! The controller writes back-to-back records into one 16 KiB circular
//! buffer:
//!
//! ```text
//! +--------+--------+---------------------------+-----+---------+
//! | status |  size  | payload ...               | FCS | pad to 4 |
//! | 2 (LE) | 2 (LE) | size - 4 bytes            |  4  |          |
//! +--------+--------+---------------------------+-----+---------+
//! ```
//!
//! With `RCR.WRAP` clear the controller wraps to the start of the buffer in
//! the middle of a record, so a payload may be split across the boundary.
//! Headers never split: records start 4-byte aligned and the buffer length
//! is a multiple of 4.
//!
//! The consumer offset belongs to the interrupt context alone. After each
//! record `CAPR` is set to `offset - 16`; the controller treats the buffer
//! as empty (`CR.BUFE`) once its write pointer `CBR` reaches `CAPR + 16`.

use core::ptr;

use crate::driver::stack::NetStack;
use crate::hal::platform::DmaRegion;
use crate::internal::constants::{
    ETH_FCS_LEN, MAX_ETH_SIZE, RX_BUF_LEN, RX_DMA_SIZE, RX_HEADER_SIZE, RX_READ_POINTER_PAD,
    RX_SIZE_UNFINISHED, align4,
};
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{CAPR, CBR, CR, MULINT, RBSTART, cr, rx_status};

/// What one [`RxRing::drain`] pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxReport {
    /// Frames delivered to the stack
    pub packets: u32,
    /// Payload bytes delivered (FCS excluded)
    pub bytes: u64,
    /// Records skipped because the controller flagged them bad
    pub errors: u32,
    /// A corrupt header forced the consumer offset to jump to `CBR`
    pub resynced: bool,
}

/// Circular receive buffer and its consumer offset.
#[derive(Debug)]
pub struct RxRing {
    region: DmaRegion,
    offset: usize,
    scratch: [u8; MAX_ETH_SIZE],
}

impl RxRing {
    /// Build a ring over `region`, which must hold [`RX_DMA_SIZE`] bytes
    /// below 4 GiB (see `dma::check_region`).
    pub fn new(region: DmaRegion) -> Self {
        debug_assert!(region.len() >= RX_DMA_SIZE);
        Self {
            region,
            offset: 0,
            scratch: [0; MAX_ETH_SIZE],
        }
    }

    /// Give the DMA region back
    pub fn into_region(self) -> DmaRegion {
        self.region
    }

    /// Current consumer offset (always 4-byte aligned)
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rewind to the start of the buffer. Only valid after a controller
    /// reset, which rewinds `CBR` and `CAPR`.
    pub fn reset_offset(&mut self) {
        self.offset = 0;
    }

    /// Tell the controller where the buffer is.
    ///
    /// Disables early-RX multiple interrupts and loads `RBSTART`; must run
    /// before `CR.RE` is set so the controller never DMAs to a stale address.
    pub fn program<R: RegisterIo>(&self, regs: &R) {
        regs.write16(MULINT, 0);
        regs.write32(RBSTART, self.region.bus_addr() as u32);
    }

    /// Deliver every complete record to `stack`.
    ///
    /// Runs until `CR.BUFE` is set, re-checking after each record since one
    /// interrupt may cover several.
    pub fn drain<R, S>(&mut self, regs: &R, stack: &mut S) -> RxReport
    where
        R: RegisterIo,
        S: NetStack + ?Sized,
    {
        let mut report = RxReport::default();

        while regs.read8(CR) & cr::BUFE == 0 {
            let (status, size) = self.header();
            if size == RX_SIZE_UNFINISHED {
                // the controller is still copying this record in
                break;
            }

            let size = usize::from(size);
            if size <= ETH_FCS_LEN || size > MAX_ETH_SIZE {
                let cbr = align4(usize::from(regs.read16(CBR))) % RX_BUF_LEN;
                warn!(
                    "RX record at {} has bad size {} (status {:#06x}), skipping to {}",
                    self.offset, size, status, cbr
                );
                report.errors += 1;
                report.resynced = true;
                self.offset = cbr;
                self.commit(regs);
                break;
            }

            if status & rx_status::ROK == 0 {
                debug!("RX record at {} dropped (status {:#06x})", self.offset, status);
                report.errors += 1;
            } else {
                let len = size - ETH_FCS_LEN;
                self.copy_payload(len);
                stack.receive(&self.scratch[..len]);
                report.packets += 1;
                report.bytes += len as u64;
            }

            self.offset = (self.offset + align4(RX_HEADER_SIZE + size)) % RX_BUF_LEN;
            self.commit(regs);
        }

        report
    }

    fn header(&self) -> (u16, u16) {
        let mut raw = [0u8; RX_HEADER_SIZE];
        let base = self.region.as_ptr().wrapping_add(self.offset);
        for (i, b) in raw.iter_mut().enumerate() {
            // SAFETY: offset is 4-aligned and below RX_BUF_LEN, so the whole
            // header lies inside the region
            *b = unsafe { ptr::read_volatile(base.add(i)) };
        }
        (
            u16::from_le_bytes([raw[0], raw[1]]),
            u16::from_le_bytes([raw[2], raw[3]]),
        )
    }

    fn copy_payload(&mut self, len: usize) {
        let start = self.offset + RX_HEADER_SIZE;
        let base = self.region.as_ptr();
        let dst = self.scratch.as_mut_ptr();

        // SAFETY: every source range lies in [0, RX_BUF_LEN) of the region
        // and len <= MAX_ETH_SIZE fits the scratch buffer
        unsafe {
            if start + len <= RX_BUF_LEN {
                ptr::copy_nonoverlapping(base.add(start), dst, len);
            } else {
                let tail = RX_BUF_LEN - start;
                ptr::copy_nonoverlapping(base.add(start), dst, tail);
                ptr::copy_nonoverlapping(base, dst.add(tail), len - tail);
            }
        }
    }

    fn commit<R: RegisterIo>(&self, regs: &R) {
        let capr = (self.offset as u16).wrapping_sub(RX_READ_POINTER_PAD as u16);
        regs.write16(CAPR, capr);
    }
}

// SAFETY: the ring owns its region; only the interrupt context touches it
unsafe impl Send for RxRing {}
