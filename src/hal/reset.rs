//! Reset Sequencer
//!
//! Issues a soft reset through `CR.RST` and polls until the controller
//! clears the bit. A reset disables TX and RX, clears the FIFOs, rewinds the
//! hardware TX pointer to slot 0 and marks the RX buffer empty. IDR0-5 and
//! MAR0-7 survive it.

use embedded_hal::delay::DelayNs;

use crate::driver::error::{IoError, IoResult};
use crate::internal::constants::{RESET_POLL_INTERVAL_US, RESET_POLL_ITERATIONS};
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{CR, cr};

// =============================================================================
// Reset Sequencer
// =============================================================================

/// Soft reset driver for the controller.
///
/// Holds no state between calls.
#[derive(Debug)]
pub struct ResetSequencer<'r, R: RegisterIo, D: DelayNs> {
    regs: &'r R,
    delay: D,
    max_iterations: u32,
}

impl<'r, R: RegisterIo, D: DelayNs> ResetSequencer<'r, R, D> {
    /// Create a sequencer with the default 1000-poll budget
    pub fn new(regs: &'r R, delay: D) -> Self {
        Self {
            regs,
            delay,
            max_iterations: RESET_POLL_ITERATIONS,
        }
    }

    /// Create a sequencer with a custom poll budget
    pub fn with_budget(regs: &'r R, delay: D, max_iterations: u32) -> Self {
        Self {
            regs,
            delay,
            max_iterations,
        }
    }

    /// Perform a soft reset.
    ///
    /// Returns [`IoError::Timeout`] if `CR.RST` is still set after the poll
    /// budget. The caller owns any ring state and must only reset it on
    /// success.
    pub fn reset(&mut self) -> IoResult<()> {
        self.regs.write8(CR, cr::RST);

        for _ in 0..self.max_iterations {
            if !self.is_reset_in_progress() {
                return Ok(());
            }
            self.delay.delay_us(RESET_POLL_INTERVAL_US);
        }

        error!("soft reset timed out after {} polls", self.max_iterations);
        Err(IoError::Timeout)
    }

    /// Check if a reset is currently in progress
    pub fn is_reset_in_progress(&self) -> bool {
        self.regs.read8(CR) & cr::RST != 0
    }

    /// Get the current poll budget
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDelay, MockRegisters};

    #[test]
    fn reset_succeeds_when_bit_clears() {
        let regs = MockRegisters::new();
        regs.set_reset_polls(5);
        let mut delay = MockDelay::new();

        let mut seq = ResetSequencer::new(&regs, &mut delay);
        assert!(seq.reset().is_ok());
        assert!(!seq.is_reset_in_progress());

        // Five polls saw RST set, each followed by a 1 µs delay
        assert_eq!(delay.total_us(), 5);
    }

    #[test]
    fn reset_writes_only_the_reset_bit() {
        let regs = MockRegisters::new();
        let mut seq = ResetSequencer::new(&regs, MockDelay::new());
        seq.reset().unwrap();

        let writes = regs.writes_to(CR);
        assert_eq!(writes, [u32::from(cr::RST)]);
    }

    #[test]
    fn reset_times_out_when_bit_never_clears() {
        let regs = MockRegisters::new();
        regs.set_reset_stuck(true);
        let mut delay = MockDelay::new();

        let mut seq = ResetSequencer::new(&regs, &mut delay);
        assert_eq!(seq.reset(), Err(IoError::Timeout));
        assert!(seq.is_reset_in_progress());

        assert_eq!(delay.total_us(), u64::from(RESET_POLL_ITERATIONS));
    }

    #[test]
    fn reset_times_out_one_poll_past_custom_budget() {
        let regs = MockRegisters::new();
        regs.set_reset_polls(10);

        let mut short = ResetSequencer::with_budget(&regs, MockDelay::new(), 10);
        assert_eq!(short.max_iterations(), 10);
        assert_eq!(short.reset(), Err(IoError::Timeout));

        regs.set_reset_polls(10);
        let mut enough = ResetSequencer::with_budget(&regs, MockDelay::new(), 11);
        assert_eq!(enough.reset(), Ok(()));
    }
}
