//! 93C46 EEPROM Serial Reader
//!
//! The controller exposes the EEPROM's four pins through `EE_CR` when it is
//! in programming mode. Reads are bit-banged: chip select, a 9-bit read
//! command (start bit + opcode + 6-bit word address) clocked out MSB first,
//! then 16 data bits clocked in MSB first.
//!
//! The sequence has no failure path. An address outside the documented
//! layout returns whatever the part holds there. If the sequence is cut
//! short (for example by a panic in the delay provider) `EE_CR` is left in
//! programming mode; nothing restores it.

use embedded_hal::delay::DelayNs;

use crate::internal::constants::{EEPROM_MAC_WORD, EEPROM_MAC_WORDS, EEPROM_SETTLE_US, ETH_ALEN};
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{EE_CR, ee};

/// Bit-banged reader for the attached 64 x 16 bit EEPROM.
#[derive(Debug)]
pub struct EepromReader<'r, R: RegisterIo, D: DelayNs> {
    regs: &'r R,
    delay: D,
}

impl<'r, R: RegisterIo, D: DelayNs> EepromReader<'r, R, D> {
    /// Create a reader over the controller's `EE_CR` register
    pub fn new(regs: &'r R, delay: D) -> Self {
        Self { regs, delay }
    }

    /// Read one 16-bit word.
    ///
    /// Only the low six bits of `addr` are sent. The word is stored
    /// little-endian in the part and returned in host order.
    pub fn read_word(&mut self, addr: u8) -> u16 {
        let cmd = (ee::CMD_READ << ee::ADDR_LEN) | u16::from(addr & ee::ADDR_MASK);
        let flags = ee::PROGRAM | ee::EECS;
        let mut word: u16 = 0;

        self.regs.write8(EE_CR, ee::PROGRAM);

        // chip select stays high until the end
        self.regs.write8(EE_CR, flags);
        self.settle();

        for bit in (0..ee::CMD_LEN).rev() {
            let eedi = if cmd & (1 << bit) != 0 { ee::EEDI } else { 0 };
            self.regs.write8(EE_CR, flags | eedi);
            self.settle();
            self.regs.write8(EE_CR, flags | ee::EESK | eedi);
            self.settle();
        }

        self.regs.write8(EE_CR, flags);
        self.settle();

        for bit in (0..ee::WORD_LEN).rev() {
            self.regs.write8(EE_CR, flags | ee::EESK);
            self.settle();
            if self.regs.read8(EE_CR) & ee::EEDO != 0 {
                word |= 1 << bit;
            }
            self.regs.write8(EE_CR, flags);
            self.settle();
        }

        self.regs.write8(EE_CR, ee::NORMAL);
        self.settle();

        u16::from_le(word)
    }

    /// Read the factory MAC address (three words from word 7).
    pub fn read_mac_address(&mut self) -> [u8; ETH_ALEN] {
        let mut mac = [0u8; ETH_ALEN];
        for (i, chunk) in mac.chunks_exact_mut(2).enumerate() {
            debug_assert!(i < EEPROM_MAC_WORDS);
            let word = self.read_word(EEPROM_MAC_WORD + i as u8);
            chunk.copy_from_slice(&word.to_ne_bytes());
        }
        mac
    }

    #[inline(always)]
    fn settle(&mut self) {
        self.delay.delay_us(EEPROM_SETTLE_US);
    }
}
