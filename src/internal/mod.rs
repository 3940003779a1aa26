//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Register capability, MMIO window and the register map
//! - [`constants`]: Frame, ring and timing constants
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. The public items it holds
//! are re-exported from the crate root; do not rely on these paths.

pub(crate) mod constants;
pub(crate) mod register;
