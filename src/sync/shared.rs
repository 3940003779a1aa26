//! ISR-safe driver wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::interrupt::IrqReturn;
use crate::driver::nic::Nic;
use crate::driver::stack::NetStack;
use crate::hal::platform::{DmaAllocator, IrqLine};
use crate::internal::register::RegisterIo;

/// ISR-safe home for one [`Nic`].
///
/// Starts empty so it can be a `static`; the probed driver is moved in with
/// [`install`](Self::install). All access goes through
/// `critical_section::with()`, disabling interrupts for the duration of the
/// closure.
///
/// # Example
///
/// ```ignore
/// static NIC: SharedNic<Mmio, Dma, Irq> = SharedNic::new();
///
/// NIC.with(|nic| nic.submit(&frame));
/// ```
pub struct SharedNic<R: RegisterIo, A: DmaAllocator, I: IrqLine> {
    inner: CriticalSectionCell<Option<Nic<R, A, I>>>,
}

impl<R: RegisterIo, A: DmaAllocator, I: IrqLine> SharedNic<R, A, I> {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Move a driver in, handing back whatever was installed before
    pub fn install(&self, nic: Nic<R, A, I>) -> Option<Nic<R, A, I>> {
        self.inner.with(|slot| slot.replace(nic))
    }

    /// Move the driver out, leaving the slot empty
    pub fn take(&self) -> Option<Nic<R, A, I>> {
        self.inner.with(Option::take)
    }

    /// A driver is installed
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Returns `None` when nothing is installed.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Nic<R, A, I>) -> T,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Like [`with`](Self::with), but also returns `None` if the driver is
    /// already borrowed.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Nic<R, A, I>) -> T,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }

    /// Interrupt entry point.
    ///
    /// Never claims the interrupt when the slot is empty, the interface is
    /// closed, or the driver is busy in another context.
    pub fn on_interrupt<S: NetStack>(&self, stack: S) -> IrqReturn {
        self.try_with(|nic| nic.on_interrupt(stack))
            .unwrap_or(IrqReturn::NotMine)
    }
}

impl<R: RegisterIo, A: DmaAllocator, I: IrqLine> Default for SharedNic<R, A, I> {
    fn default() -> Self {
        Self::new()
    }
}
