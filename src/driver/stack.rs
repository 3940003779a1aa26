//! Upward interface to the network stack.

use crate::phy::link::LinkEvent;

/// Receiver of everything the interrupt context produces.
///
/// All three methods are called from interrupt context and must not block.
pub trait NetStack {
    /// A received frame, FCS stripped. The slice is only valid for the call.
    fn receive(&mut self, frame: &[u8]);

    /// Carrier came up or went down
    fn link_changed(&mut self, event: LinkEvent);

    /// The TX ring has room again after a `Full` submission
    fn wake_queue(&mut self);
}

impl<T: NetStack + ?Sized> NetStack for &mut T {
    fn receive(&mut self, frame: &[u8]) {
        (**self).receive(frame);
    }

    fn link_changed(&mut self, event: LinkEvent) {
        (**self).link_changed(event);
    }

    fn wake_queue(&mut self) {
        (**self).wake_queue();
    }
}
