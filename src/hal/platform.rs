//! Platform collaborators: coherent DMA memory and the shared IRQ line.
//!
//! The driver core never allocates or routes interrupts itself. The platform
//! hands it a [`DmaAllocator`] and an [`IrqLine`] at probe time, and the
//! driver acquires and releases through them in `open()` / `close()`.

use core::ptr::NonNull;

use crate::driver::error::{DmaResult, IoResult};

// =============================================================================
// DMA Region
// =============================================================================

/// A coherent DMA buffer.
///
/// Holds the CPU-visible pointer and the device-visible bus address of the
/// same memory. Not `Clone`: the region is owned by exactly one ring and
/// returned to the allocator exactly once.
#[derive(Debug)]
pub struct DmaRegion {
    cpu: NonNull<u8>,
    bus: u64,
    len: usize,
}

impl DmaRegion {
    /// Describe a coherent buffer.
    ///
    /// # Safety
    ///
    /// - `cpu` must be valid for reads and writes of `len` bytes until the
    ///   region is handed back to [`DmaAllocator::free_coherent`]
    /// - `bus` must be the address the device uses for the same memory
    /// - the memory must be coherent with the device (no cache maintenance)
    pub unsafe fn new(cpu: NonNull<u8>, bus: u64, len: usize) -> Self {
        Self { cpu, bus, len }
    }

    /// CPU-visible base pointer
    #[inline(always)]
    pub fn as_ptr(&self) -> *mut u8 {
        self.cpu.as_ptr()
    }

    /// Device-visible base address
    #[inline(always)]
    pub fn bus_addr(&self) -> u64 {
        self.bus
    }

    /// Length in bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length region
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// SAFETY: a DmaRegion owns its buffer; moving it between contexts moves that
// ownership. Shared access is coordinated by the ring that holds it.
unsafe impl Send for DmaRegion {}

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Source of coherent DMA memory.
pub trait DmaAllocator {
    /// Allocate `len` bytes of coherent memory.
    fn alloc_coherent(&mut self, len: usize) -> DmaResult<DmaRegion>;

    /// Return a region obtained from [`alloc_coherent`](Self::alloc_coherent).
    ///
    /// Infallible so teardown can always run to completion.
    fn free_coherent(&mut self, region: DmaRegion);
}

/// A shared interrupt line routed to this controller.
///
/// Requesting the line hooks the driver's [`InterruptHandler`] on the
/// platform side; releasing it unhooks the handler. The driver core only
/// tracks when each happens.
///
/// [`InterruptHandler`]: crate::driver::interrupt::InterruptHandler
pub trait IrqLine {
    /// Claim the line in shared mode.
    fn request_shared(&mut self) -> IoResult<()>;

    /// Give the line back. Infallible so teardown can always run.
    fn release(&mut self);
}
