//! Memory-mapped register access for the RTL8139 register window.
//!
//! [`RegisterIo`] is the capability every driver component is handed instead
//! of a raw pointer. [`Mmio`] is the volatile implementation over a mapped
//! window; tests substitute a simulated register file.

pub mod map;

use core::ptr::NonNull;

use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::REGISTER_WINDOW;

// =============================================================================
// Register Capability
// =============================================================================

/// Width-specific access to the controller's little-endian registers.
///
/// The plain accessors convert between little-endian device order and host
/// order. The `raw` writers store the value's in-memory byte layout verbatim,
/// which is what multi-byte identifiers such as the MAC address need.
///
/// Accesses have no failure mode: the window is assumed to be mapped and
/// live for as long as the implementor exists.
pub trait RegisterIo {
    /// Read an 8-bit register
    fn read8(&self, offset: usize) -> u8;
    /// Read a 16-bit register
    fn read16(&self, offset: usize) -> u16;
    /// Read a 32-bit register
    fn read32(&self, offset: usize) -> u32;
    /// Write an 8-bit register
    fn write8(&self, offset: usize, value: u8);
    /// Write a 16-bit register
    fn write16(&self, offset: usize, value: u16);
    /// Write a 32-bit register
    fn write32(&self, offset: usize, value: u32);
    /// Write 16 bits without byte order conversion
    fn write_raw16(&self, offset: usize, value: u16);
    /// Write 32 bits without byte order conversion
    fn write_raw32(&self, offset: usize, value: u32);

    /// Read-modify-write an 8-bit register
    #[inline(always)]
    fn modify8<F>(&self, offset: usize, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read8(offset);
        self.write8(offset, f(value));
    }
}

impl<T: RegisterIo + ?Sized> RegisterIo for &T {
    #[inline(always)]
    fn read8(&self, offset: usize) -> u8 {
        (**self).read8(offset)
    }
    #[inline(always)]
    fn read16(&self, offset: usize) -> u16 {
        (**self).read16(offset)
    }
    #[inline(always)]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }
    #[inline(always)]
    fn write8(&self, offset: usize, value: u8) {
        (**self).write8(offset, value);
    }
    #[inline(always)]
    fn write16(&self, offset: usize, value: u16) {
        (**self).write16(offset, value);
    }
    #[inline(always)]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value);
    }
    #[inline(always)]
    fn write_raw16(&self, offset: usize, value: u16) {
        (**self).write_raw16(offset, value);
    }
    #[inline(always)]
    fn write_raw32(&self, offset: usize, value: u32) {
        (**self).write_raw32(offset, value);
    }
}

// =============================================================================
// Volatile MMIO Window
// =============================================================================

/// Volatile accessor over a mapped register window.
#[derive(Debug)]
pub struct Mmio {
    base: NonNull<u8>,
    len: usize,
}

impl Mmio {
    /// Wrap a mapped register window.
    ///
    /// Returns [`ConfigError::RegionTooSmall`] when `len` cannot hold the
    /// 256-byte register file.
    ///
    /// # Safety
    ///
    /// `base` must point to the controller's register window, mapped as
    /// device memory for `len` bytes and for the lifetime of the returned
    /// value. No other code may assume exclusive access to it.
    pub unsafe fn new(base: NonNull<u8>, len: usize) -> ConfigResult<Self> {
        if len < REGISTER_WINDOW {
            return Err(ConfigError::RegionTooSmall);
        }
        Ok(Self { base, len })
    }

    /// Size of the mapped window
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a window smaller than the register file is rejected
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    fn at<T>(&self, offset: usize) -> *mut T {
        debug_assert!(offset + core::mem::size_of::<T>() <= self.len);
        self.base.as_ptr().wrapping_add(offset).cast()
    }
}

impl RegisterIo for Mmio {
    #[inline(always)]
    fn read8(&self, offset: usize) -> u8 {
        // SAFETY: the window is mapped per `Mmio::new`
        unsafe { core::ptr::read_volatile(self.at::<u8>(offset)) }
    }

    #[inline(always)]
    fn read16(&self, offset: usize) -> u16 {
        // SAFETY: the window is mapped per `Mmio::new`
        u16::from_le(unsafe { core::ptr::read_volatile(self.at::<u16>(offset)) })
    }

    #[inline(always)]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: the window is mapped per `Mmio::new`
        u32::from_le(unsafe { core::ptr::read_volatile(self.at::<u32>(offset)) })
    }

    #[inline(always)]
    fn write8(&self, offset: usize, value: u8) {
        // SAFETY: the window is mapped per `Mmio::new`
        unsafe { core::ptr::write_volatile(self.at::<u8>(offset), value) }
    }

    #[inline(always)]
    fn write16(&self, offset: usize, value: u16) {
        self.write_raw16(offset, value.to_le());
    }

    #[inline(always)]
    fn write32(&self, offset: usize, value: u32) {
        self.write_raw32(offset, value.to_le());
    }

    #[inline(always)]
    fn write_raw16(&self, offset: usize, value: u16) {
        // SAFETY: the window is mapped per `Mmio::new`
        unsafe { core::ptr::write_volatile(self.at::<u16>(offset), value) }
    }

    #[inline(always)]
    fn write_raw32(&self, offset: usize, value: u32) {
        // SAFETY: the window is mapped per `Mmio::new`
        unsafe { core::ptr::write_volatile(self.at::<u32>(offset), value) }
    }
}

// SAFETY: Mmio only performs volatile accesses to device memory; sharing it
// between the submit and interrupt contexts is how the controller is driven.
unsafe impl Send for Mmio {}
// SAFETY: see above
unsafe impl Sync for Mmio {}
