//! Internal PHY
//!
//! The RTL8139 integrates its 10/100 PHY; there is no MDIO bus to drive.
//! Link state and speed are read from the media status register.

pub mod link;

pub use link::{LinkEvent, LinkMonitor, LinkSpeed};
