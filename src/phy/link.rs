//! Link State Tracking
//!
//! The RTL8139's PHY is internal and reports through the media status
//! register (`MSR`). The controller raises `LNKCHG` whenever the cable state
//! moves, but the interrupt alone does not say which way, and several edges
//! can collapse into one interrupt. [`LinkMonitor`] samples `MSR.LINK_BAD`
//! and reports only real transitions.

use core::fmt;

use crate::internal::register::RegisterIo;
use crate::internal::register::map::{MSR, msr};

/// Carrier transition delivered to the network stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Carrier acquired
    Up,
    /// Carrier lost
    Down,
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEvent::Up => f.write_str("up"),
            LinkEvent::Down => f.write_str("down"),
        }
    }
}

/// Negotiated line rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkSpeed {
    /// 10BASE-T
    Mbps10,
    /// 100BASE-TX
    Mbps100,
}

impl LinkSpeed {
    /// Decode `MSR.SPD_10`
    pub fn from_msr(msr_val: u8) -> Self {
        if msr_val & msr::SPD_10 != 0 {
            LinkSpeed::Mbps10
        } else {
            LinkSpeed::Mbps100
        }
    }

    /// Rate in Mbit/s
    pub const fn mbps(self) -> u32 {
        match self {
            LinkSpeed::Mbps10 => 10,
            LinkSpeed::Mbps100 => 100,
        }
    }
}

/// Edge detector over `MSR.LINK_BAD`.
///
/// Starts in the down state, so the first sample with carrier present
/// yields [`LinkEvent::Up`].
#[derive(Debug, Default)]
pub struct LinkMonitor {
    up: bool,
}

impl LinkMonitor {
    /// Monitor in the down state
    pub const fn new() -> Self {
        Self { up: false }
    }

    /// Last reported state
    pub fn is_up(&self) -> bool {
        self.up
    }

    /// Forget the last state. Used when the interface is brought up again.
    pub fn reset(&mut self) {
        self.up = false;
    }

    /// Sample `MSR` and report a transition, if there was one
    pub fn check<R: RegisterIo>(&mut self, regs: &R) -> Option<LinkEvent> {
        let up = regs.read8(MSR) & msr::LINK_BAD == 0;
        if up == self.up {
            return None;
        }
        self.up = up;

        let event = if up { LinkEvent::Up } else { LinkEvent::Down };
        info!("link {}", event);
        Some(event)
    }
}
