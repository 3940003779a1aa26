//! RTL8139 Interface Driver
//!
//! [`Nic`] is the single driver context for one controller. It owns the
//! register capability, the platform collaborators and, while the interface
//! is up, the two DMA rings.
//!
//! # Lifecycle
//!
//! ```text
//! probe() ──► closed ──open()──► open ──close()──► closed
//!                                 │
//!                                 └── split() ──► Transmitter + IrqContext
//! ```
//!
//! `open()` acquires the RX buffer, the TX buffer and the IRQ line in that
//! order and unwinds whatever it already holds if a later step fails.
//! `close()` quiesces the controller and releases IRQ line, TX buffer and RX
//! buffer, each unconditionally.

use embedded_hal::delay::DelayNs;

use crate::dma::{RxRing, TxRing, TxStatus, check_region};
use crate::driver::config::{LedMode, NicConfig, is_valid_unicast};
use crate::driver::error::{ConfigError, DmaResult, Error, IoError, IoResult, Result, TxError};
use crate::driver::interrupt::{InterruptHandler, IrqContext, IrqReturn};
use crate::driver::stack::NetStack;
use crate::driver::stats::{Counters, NicStats};
use crate::driver::version::ChipVersion;
use crate::hal::eeprom::EepromReader;
use crate::hal::platform::{DmaAllocator, DmaRegion, IrqLine};
use crate::hal::reset::ResetSequencer;
use crate::internal::constants::{ETH_ALEN, MAX_MTU, RX_DMA_SIZE, TX_DMA_SIZE};
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{
    CONFIG1, CR, EE_CR, IDR0, IDR4, IMR, ISR, MSR, RCR, TCR, config1, cr, ee, int, msr,
};
use crate::phy::link::{LinkMonitor, LinkSpeed};

// =============================================================================
// Rings
// =============================================================================

/// Resources held only while the interface is open
#[derive(Debug)]
struct Rings {
    tx: TxRing,
    rx: RxRing,
}

// =============================================================================
// Transmitter
// =============================================================================

/// Submission-context half of an open interface.
///
/// Shares the TX ring with the [`IrqContext`] returned by the same
/// [`Nic::split`] call. Submitting needs `&mut self`, so the ring has one
/// producer even when the handle is reachable from several threads:
///
/// ```compile_fail
/// use rtl8139_core::{Mmio, Transmitter};
///
/// fn submit_shared(tx: &Transmitter<'_, Mmio>, frame: &[u8]) {
///     let _ = tx.submit(frame);
/// }
/// ```
#[derive(Debug)]
pub struct Transmitter<'a, R: RegisterIo> {
    regs: &'a R,
    tx: &'a TxRing,
    counters: &'a Counters,
}

impl<R: RegisterIo> Transmitter<'_, R> {
    /// Hand one frame (FCS excluded) to the controller.
    ///
    /// On [`TxStatus::Full`] the caller must stop submitting until
    /// [`NetStack::wake_queue`] is called. Refused frames are counted as
    /// dropped.
    pub fn submit(&mut self, frame: &[u8]) -> core::result::Result<TxStatus, TxError> {
        let res = self.tx.submit(self.regs, frame);
        if let Err(e) = res {
            if e == TxError::Oversized {
                warn!("TX dropped, {} bytes is too big", frame.len());
            } else {
                debug!("TX refused: {}", e.as_str());
            }
            self.counters.record_tx_dropped();
        }
        res
    }

    /// A `Full` report is still waiting for its resume
    pub fn is_stopped(&self) -> bool {
        self.tx.is_stopped()
    }

    /// Armed slots the controller has not resolved yet
    pub fn in_flight(&self) -> usize {
        self.tx.in_flight()
    }
}

// =============================================================================
// NIC Driver
// =============================================================================

/// RTL8139 driver context.
///
/// # Type Parameters
/// * `R` - register capability ([`Mmio`](crate::Mmio) on hardware)
/// * `A` - coherent DMA allocator
/// * `I` - shared interrupt line
#[derive(Debug)]
pub struct Nic<R: RegisterIo, A: DmaAllocator, I: IrqLine> {
    regs: R,
    dma: A,
    irq: I,
    config: NicConfig,
    chip: ChipVersion,
    mac: [u8; ETH_ALEN],
    rings: Option<Rings>,
    link: LinkMonitor,
    counters: Counters,
}

impl<R: RegisterIo, A: DmaAllocator, I: IrqLine> Nic<R, A, I> {
    /// Identify and reset the controller and learn its station address.
    ///
    /// The address comes from `config.mac_address` when set, otherwise from
    /// the EEPROM. The interface is left closed.
    ///
    /// # Errors
    /// - `ConfigError::*` - invalid configuration
    /// - `ConfigError::UnsupportedChip` - anything but an RTL8100B/8139D
    /// - `IoError::Timeout` - the soft reset did not complete
    pub fn probe<D: DelayNs>(
        regs: R,
        dma: A,
        irq: I,
        config: NicConfig,
        mut delay: D,
    ) -> Result<Self> {
        config.validate()?;

        let chip = ChipVersion::from_tcr(regs.read32(TCR));
        info!("chipset detected: {}", chip.name());
        if !chip.is_supported() {
            error!("chipset {} is not supported", chip.name());
            return Err(ConfigError::UnsupportedChip.into());
        }

        ResetSequencer::new(&regs, &mut delay).reset()?;

        let mac = match config.mac_address {
            Some(mac) => mac,
            None => {
                let mac = EepromReader::new(&regs, &mut delay).read_mac_address();
                if !is_valid_unicast(&mac) {
                    warn!("EEPROM holds an unusable MAC address");
                }
                mac
            }
        };
        debug!(
            "MAC {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
        );

        Ok(Self {
            regs,
            dma,
            irq,
            config,
            chip,
            mac,
            rings: None,
            link: LinkMonitor::new(),
            counters: Counters::new(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Detected chip revision
    pub fn chip_version(&self) -> ChipVersion {
        self.chip
    }

    /// Current station address
    pub fn mac_address(&self) -> &[u8; ETH_ALEN] {
        &self.mac
    }

    /// Active configuration
    pub fn config(&self) -> &NicConfig {
        &self.config
    }

    /// Configured MTU
    pub fn mtu(&self) -> usize {
        self.config.mtu
    }

    /// Largest MTU the controller can carry
    pub const fn max_mtu() -> usize {
        MAX_MTU
    }

    /// Rings and IRQ line are held
    pub fn is_open(&self) -> bool {
        self.rings.is_some()
    }

    /// The register capability
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Counter snapshot
    pub fn stats(&self) -> NicStats {
        self.counters.snapshot()
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Bring the interface up.
    ///
    /// # Errors
    /// - `ConfigError::AlreadyOpen` - already up
    /// - `DmaError::*` - a buffer could not be allocated or is unusable
    /// - `IoError::IrqUnavailable` - the IRQ line could not be requested
    /// - `IoError::Timeout` - the soft reset did not complete
    ///
    /// On any error nothing stays acquired.
    pub fn open<D: DelayNs>(&mut self, mut delay: D) -> Result<()> {
        if self.rings.is_some() {
            return Err(ConfigError::AlreadyOpen.into());
        }
        info!("bringing interface up");

        let mut rings = self.acquire()?;

        let reset = ResetSequencer::new(&self.regs, &mut delay).reset();
        if let Err(e) = reset {
            self.release(rings);
            return Err(e.into());
        }

        // the reset rewound the controller's TX slot pointer and RX offsets
        rings.tx.reset_indices();
        rings.rx.reset_offset();

        self.write_mac();
        if self.config.tx_enabled {
            self.setup_tx(&rings.tx);
        }
        if self.config.rx_enabled {
            self.setup_rx(&rings.rx);
        }

        self.link.reset();
        self.regs.write16(ISR, int::CLEAR);
        self.enable_irq();

        self.rings = Some(rings);
        Ok(())
    }

    /// Bring the interface down.
    ///
    /// # Errors
    /// - `IoError::NotOpen` - the interface was not up
    pub fn close(&mut self) -> IoResult<()> {
        let rings = self.rings.take().ok_or(IoError::NotOpen)?;
        info!("bringing interface down");

        self.disable_transceiver();
        self.disable_irq();
        self.release(rings);
        Ok(())
    }

    fn alloc_checked(&mut self, len: usize) -> DmaResult<DmaRegion> {
        let region = self.dma.alloc_coherent(len)?;
        if let Err(e) = check_region(&region, len) {
            error!("unusable DMA region: {}", e.as_str());
            self.dma.free_coherent(region);
            return Err(e);
        }
        Ok(region)
    }

    fn acquire(&mut self) -> Result<Rings> {
        let rx = self.alloc_checked(RX_DMA_SIZE)?;

        let tx = match self.alloc_checked(TX_DMA_SIZE) {
            Ok(tx) => tx,
            Err(e) => {
                self.dma.free_coherent(rx);
                return Err(e.into());
            }
        };

        if let Err(e) = self.irq.request_shared() {
            error!("cannot request IRQ line: {}", e.as_str());
            self.dma.free_coherent(tx);
            self.dma.free_coherent(rx);
            return Err(e.into());
        }

        Ok(Rings {
            tx: TxRing::new(tx, self.config.tsd_flags()),
            rx: RxRing::new(rx),
        })
    }

    fn release(&mut self, rings: Rings) {
        self.irq.release();
        self.dma.free_coherent(rings.tx.into_region());
        self.dma.free_coherent(rings.rx.into_region());
    }

    // =========================================================================
    // Hardware Setup
    // =========================================================================

    fn setup_tx(&self, tx: &TxRing) {
        self.regs.modify8(CR, |v| (v & !cr::BUFE) | cr::TE);
        self.regs.write32(TCR, self.config.tcr());
        tx.program(&self.regs);
    }

    fn setup_rx(&self, rx: &RxRing) {
        // RBSTART must be valid before the receiver starts
        rx.program(&self.regs);
        self.regs.modify8(CR, |v| (v & !cr::BUFE) | cr::RE);
        self.regs.write32(RCR, self.config.rcr());
    }

    /// Stop TX and RX and with them all bus-master DMA
    pub fn disable_transceiver(&self) {
        self.regs.write8(CR, 0);
    }

    /// Unmask the configured interrupt sources
    pub fn enable_irq(&self) {
        self.regs.write16(IMR, self.config.interrupts);
    }

    /// Mask every interrupt source
    pub fn disable_irq(&self) {
        self.regs.write16(IMR, 0);
    }

    fn write_mac(&self) {
        let m = &self.mac;
        self.regs.write8(EE_CR, ee::CFG_WRITE_ENABLE);
        // IDR only takes 32-bit writes
        self.regs
            .write_raw32(IDR0, u32::from_ne_bytes([m[0], m[1], m[2], m[3]]));
        self.regs
            .write_raw32(IDR4, u32::from_ne_bytes([m[4], m[5], 0, 0]));
        self.regs.write8(EE_CR, ee::NORMAL);
    }

    // =========================================================================
    // Runtime Configuration
    // =========================================================================

    /// Change the station address.
    ///
    /// # Errors
    /// - `ConfigError::InvalidMacAddress` - multicast or all-zero address
    pub fn set_mac_address(&mut self, mac: [u8; ETH_ALEN]) -> Result<()> {
        if !is_valid_unicast(&mac) {
            return Err(ConfigError::InvalidMacAddress.into());
        }
        self.mac = mac;
        self.write_mac();
        Ok(())
    }

    /// Select what the activity LEDs show; other `CONFIG1` bits are kept
    pub fn configure_leds(&mut self, mode: LedMode) {
        let cfg1 = self.regs.read8(CONFIG1) & !config1::LEDS_MASK;
        self.regs.write8(EE_CR, ee::CFG_WRITE_ENABLE);
        self.regs.write8(CONFIG1, cfg1 | mode.config1_bits());
        self.regs.write8(EE_CR, ee::NORMAL);
    }

    /// Line rate reported by the PHY
    pub fn link_speed(&self) -> LinkSpeed {
        LinkSpeed::from_msr(self.regs.read8(MSR))
    }

    /// Carrier currently present
    pub fn is_link_up(&self) -> bool {
        self.regs.read8(MSR) & msr::LINK_BAD == 0
    }

    // =========================================================================
    // Data Path
    // =========================================================================

    /// Split an open interface into its submission and interrupt halves.
    ///
    /// # Errors
    /// - `IoError::NotOpen` - the interface is down
    pub fn split<S: NetStack>(
        &mut self,
        stack: S,
    ) -> IoResult<(Transmitter<'_, R>, IrqContext<'_, R, S>)> {
        let Self {
            regs,
            rings,
            link,
            counters,
            config,
            ..
        } = self;
        let Rings { tx, rx } = rings.as_mut().ok_or(IoError::NotOpen)?;
        let regs: &R = regs;
        let tx: &TxRing = tx;
        let counters: &Counters = counters;

        Ok((
            Transmitter { regs, tx, counters },
            IrqContext::new(regs, tx, rx, link, counters, config.interrupts, stack),
        ))
    }

    /// Submit one frame without splitting.
    ///
    /// # Errors
    /// - `IoError::NotOpen` - the interface is down
    /// - `TxError::*` - see [`Transmitter::submit`]
    pub fn submit(&mut self, frame: &[u8]) -> Result<TxStatus> {
        let rings = self.rings.as_ref().ok_or(IoError::NotOpen)?;
        let mut tx = Transmitter {
            regs: &self.regs,
            tx: &rings.tx,
            counters: &self.counters,
        };
        tx.submit(frame).map_err(Error::from)
    }

    /// Service an interrupt without splitting. A closed interface never
    /// claims the interrupt.
    pub fn on_interrupt<S: NetStack>(&mut self, stack: S) -> IrqReturn {
        match self.split(stack) {
            Ok((_, mut ctx)) => ctx.on_interrupt(),
            Err(_) => IrqReturn::NotMine,
        }
    }
}

impl<R: RegisterIo, A: DmaAllocator, I: IrqLine> Drop for Nic<R, A, I> {
    fn drop(&mut self) {
        if self.is_open() {
            debug!("closing interface on drop");
            let _ = self.close();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
