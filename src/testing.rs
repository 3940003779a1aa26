//! Testing utilities and mock implementations
//!
//! Host-side stand-ins for the controller and the platform so the driver
//! core can be exercised without hardware.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use core::ptr::NonNull;
use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::sync::{Arc, Mutex};
use std::vec;
use std::vec::Vec;

use crate::driver::error::{DmaError, DmaResult, IoError, IoResult};
use crate::driver::stack::NetStack;
use crate::hal::platform::{DmaAllocator, DmaRegion, IrqLine};
use crate::internal::constants::{ETH_ALEN, ETH_FCS_LEN, RX_BUF_LEN, RX_HEADER_SIZE, align4};
use crate::internal::register::RegisterIo;
use crate::internal::register::map::{
    CAPR, CBR, CR, EE_CR, ISR, MSR, TCR, TSD0, TSD_GAP, cr, ee, int, msr, tcr, tsd,
};
use crate::phy::link::LinkEvent;

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay that records the total requested time and returns immediately
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }
}

// =============================================================================
// 93C46 Responder
// =============================================================================

/// Minimal 93C46 model: shifts in a command on SK rising edges while CS is
/// high, then shifts out the addressed word MSB first.
#[derive(Debug)]
struct Eeprom93c46 {
    words: [u16; 64],
    sk: bool,
    cmd: u16,
    cmd_bits: u32,
    out: u16,
    out_bits: u32,
    dout: bool,
}

impl Eeprom93c46 {
    fn new() -> Self {
        Self {
            words: [0; 64],
            sk: false,
            cmd: 0,
            cmd_bits: 0,
            out: 0,
            out_bits: 0,
            dout: false,
        }
    }

    fn deselect(&mut self) {
        self.sk = false;
        self.cmd = 0;
        self.cmd_bits = 0;
        self.out_bits = 0;
        self.dout = false;
    }

    fn drive(&mut self, pins: u8) {
        let programming = pins & 0xc0 == ee::PROGRAM;
        if !programming || pins & ee::EECS == 0 {
            self.deselect();
            return;
        }

        let sk = pins & ee::EESK != 0;
        if sk && !self.sk {
            if self.out_bits > 0 {
                self.out_bits -= 1;
                self.dout = (self.out >> self.out_bits) & 1 != 0;
            } else if self.cmd_bits < ee::CMD_LEN {
                self.cmd = (self.cmd << 1) | u16::from(pins & ee::EEDI != 0);
                self.cmd_bits += 1;
                if self.cmd_bits == ee::CMD_LEN && self.cmd >> ee::ADDR_LEN == ee::CMD_READ {
                    let addr = usize::from(self.cmd as u8 & ee::ADDR_MASK);
                    self.out = self.words[addr];
                    self.out_bits = ee::WORD_LEN;
                    // dummy zero before D15
                    self.dout = false;
                }
            }
        }
        self.sk = sk;
    }
}

// =============================================================================
// Mock Registers
// =============================================================================

/// Access width of a logged register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

/// A logged register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    pub offset: usize,
    pub width: Width,
    pub value: u32,
    pub raw: bool,
}

#[derive(Debug)]
struct RegState {
    file: [u8; 256],
    log: Vec<RegWrite>,
    reset_polls: u32,
    reset_remaining: u32,
    reset_stuck: bool,
    eeprom: Eeprom93c46,
    tx_auto_complete: bool,
}

impl RegState {
    fn get(&self, offset: usize, n: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes[..n].copy_from_slice(&self.file[offset..offset + n]);
        u32::from_le_bytes(bytes)
    }

    fn put(&mut self, offset: usize, n: usize, value: u32) {
        self.file[offset..offset + n].copy_from_slice(&value.to_le_bytes()[..n]);
    }

    fn rx_empty(&self) -> bool {
        let capr = self.get(CAPR, 2) as u16;
        let cbr = self.get(CBR, 2) as u16;
        usize::from(capr.wrapping_add(16)) % RX_BUF_LEN == usize::from(cbr) % RX_BUF_LEN
    }

    fn hardware_reset(&mut self) {
        self.file[CR] = cr::RST;
        self.put(CAPR, 2, 0xfff0);
        self.put(CBR, 2, 0);
        self.reset_remaining = self.reset_polls;
    }
}

/// Simulated RTL8139 register file.
///
/// Models just enough behaviour for the driver core:
/// - `CR.RST` self-clears after a configurable number of polls (or never)
/// - `CR.BUFE` reflects `CAPR + 16 == CBR`
/// - `ISR` is write-1-to-clear
/// - `TCR` version bits are read-only
/// - `TSD` writes arm a slot; completion is manual or automatic
/// - `EE_CR` drives a 93C46 responder
///
/// Every write is logged in order.
#[derive(Debug)]
pub struct MockRegisters {
    state: Mutex<RegState>,
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegisters {
    /// Register file in its post-reset state with the link down
    pub fn new() -> Self {
        let mut state = RegState {
            file: [0; 256],
            log: Vec::new(),
            reset_polls: 0,
            reset_remaining: 0,
            reset_stuck: false,
            eeprom: Eeprom93c46::new(),
            tx_auto_complete: false,
        };
        state.put(CAPR, 2, 0xfff0);
        state.file[MSR] = msr::LINK_BAD;
        Self {
            state: Mutex::new(state),
        }
    }

    /// Register file reporting the given TCR hardware version bits
    pub fn with_version(bits: u32) -> Self {
        let regs = Self::new();
        regs.set_version_bits(bits);
        regs
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegState> {
        self.state.lock().unwrap()
    }

    // --- configuration ---------------------------------------------------

    /// Number of CR polls that still see RST after a reset is issued
    pub fn set_reset_polls(&self, polls: u32) {
        let mut s = self.lock();
        s.reset_polls = polls;
        s.reset_remaining = polls;
    }

    /// Keep RST set forever
    pub fn set_reset_stuck(&self, stuck: bool) {
        self.lock().reset_stuck = stuck;
    }

    pub fn set_version_bits(&self, bits: u32) {
        let mut s = self.lock();
        let tcr_val = s.get(TCR, 4) & !tcr::HWVERID_MASK;
        s.put(TCR, 4, tcr_val | (bits & tcr::HWVERID_MASK));
    }

    pub fn set_eeprom_word(&self, addr: u8, value: u16) {
        self.lock().eeprom.words[usize::from(addr & ee::ADDR_MASK)] = value;
    }

    /// Store a MAC address the way the factory image does (word 7 onwards)
    pub fn set_eeprom_mac(&self, mac: [u8; ETH_ALEN]) {
        for i in 0..ETH_ALEN / 2 {
            let word = u16::from_le_bytes([mac[2 * i], mac[2 * i + 1]]);
            self.set_eeprom_word(7 + i as u8, word);
        }
    }

    /// Complete every armed TX slot as soon as it is armed
    pub fn set_tx_auto_complete(&self, on: bool) {
        self.lock().tx_auto_complete = on;
    }

    // --- stimulus --------------------------------------------------------

    /// Latch interrupt status bits
    pub fn raise(&self, bits: u16) {
        let mut s = self.lock();
        let isr = s.get(ISR, 2) as u16;
        s.put(ISR, 2, u32::from(isr | bits));
    }

    /// Resolve TX slot `slot` with the given TSD status bits
    pub fn complete_tx(&self, slot: usize, status: u32) {
        let mut s = self.lock();
        let off = TSD0 + slot * TSD_GAP;
        let v = s.get(off, 4) | status | tsd::OWN;
        s.put(off, 4, v);
        let isr = s.get(ISR, 2) as u16;
        let bit = if status & tsd::TOK != 0 { int::TOK } else { int::TER };
        s.put(ISR, 2, u32::from(isr | bit));
    }

    pub fn set_link_bad(&self, bad: bool) {
        let mut s = self.lock();
        if bad {
            s.file[MSR] |= msr::LINK_BAD;
        } else {
            s.file[MSR] &= !msr::LINK_BAD;
        }
    }

    pub fn set_speed_10(&self, slow: bool) {
        let mut s = self.lock();
        if slow {
            s.file[MSR] |= msr::SPD_10;
        } else {
            s.file[MSR] &= !msr::SPD_10;
        }
    }

    /// Move the hardware RX write pointer
    pub fn set_cbr(&self, cbr: u16) {
        self.lock().put(CBR, 2, u32::from(cbr));
    }

    /// Poke a register without logging or side effects
    pub fn poke8(&self, offset: usize, value: u8) {
        self.lock().file[offset] = value;
    }

    // --- inspection ------------------------------------------------------

    pub fn peek8(&self, offset: usize) -> u8 {
        self.lock().file[offset]
    }

    pub fn peek16(&self, offset: usize) -> u16 {
        self.lock().get(offset, 2) as u16
    }

    pub fn peek32(&self, offset: usize) -> u32 {
        self.lock().get(offset, 4)
    }

    /// Raw bytes of the register file
    pub fn bytes(&self, offset: usize, len: usize) -> Vec<u8> {
        self.lock().file[offset..offset + len].to_vec()
    }

    pub fn writes(&self) -> Vec<RegWrite> {
        self.lock().log.clone()
    }

    /// Values written to `offset`, in order, any width
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.lock()
            .log
            .iter()
            .filter(|w| w.offset == offset)
            .map(|w| w.value)
            .collect()
    }

    pub fn clear_writes(&self) {
        self.lock().log.clear();
    }

    fn record(s: &mut RegState, offset: usize, width: Width, value: u32, raw: bool) {
        s.log.push(RegWrite {
            offset,
            width,
            value,
            raw,
        });
    }
}

impl RegisterIo for MockRegisters {
    fn read8(&self, offset: usize) -> u8 {
        let mut s = self.lock();
        match offset {
            CR => {
                if s.file[CR] & cr::RST != 0 && !s.reset_stuck {
                    if s.reset_remaining == 0 {
                        s.file[CR] &= !cr::RST;
                    } else {
                        s.reset_remaining -= 1;
                    }
                }
                let bufe = if s.rx_empty() { cr::BUFE } else { 0 };
                s.file[CR] | bufe
            }
            EE_CR => (s.file[EE_CR] & !ee::EEDO) | u8::from(s.eeprom.dout),
            _ => s.file[offset],
        }
    }

    fn read16(&self, offset: usize) -> u16 {
        self.lock().get(offset, 2) as u16
    }

    fn read32(&self, offset: usize) -> u32 {
        self.lock().get(offset, 4)
    }

    fn write8(&self, offset: usize, value: u8) {
        let mut s = self.lock();
        Self::record(&mut s, offset, Width::W8, u32::from(value), false);
        match offset {
            CR if value & cr::RST != 0 => s.hardware_reset(),
            CR => s.file[CR] = value & !cr::BUFE,
            EE_CR => {
                s.file[EE_CR] = value;
                s.eeprom.drive(value);
            }
            _ => s.file[offset] = value,
        }
    }

    fn write16(&self, offset: usize, value: u16) {
        let mut s = self.lock();
        Self::record(&mut s, offset, Width::W16, u32::from(value), false);
        if offset == ISR {
            let isr = s.get(ISR, 2) as u16;
            s.put(ISR, 2, u32::from(isr & !value));
        } else {
            s.put(offset, 2, u32::from(value));
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        let mut s = self.lock();
        Self::record(&mut s, offset, Width::W32, value, false);
        match offset {
            TCR => {
                let ver = s.get(TCR, 4) & tcr::HWVERID_MASK;
                s.put(TCR, 4, (value & !tcr::HWVERID_MASK) | ver);
            }
            o if (TSD0..TSD0 + 4 * TSD_GAP).contains(&o) => {
                let armed = value & (tsd::SIZE_MASK | tsd::ERTXTH_MASK);
                if s.tx_auto_complete {
                    s.put(o, 4, armed | tsd::OWN | tsd::TOK);
                    let isr = s.get(ISR, 2) as u16;
                    s.put(ISR, 2, u32::from(isr | int::TOK));
                } else {
                    s.put(o, 4, armed);
                }
            }
            _ => s.put(offset, 4, value),
        }
    }

    fn write_raw16(&self, offset: usize, value: u16) {
        let mut s = self.lock();
        Self::record(&mut s, offset, Width::W16, u32::from(value), true);
        s.file[offset..offset + 2].copy_from_slice(&value.to_ne_bytes());
    }

    fn write_raw32(&self, offset: usize, value: u32) {
        let mut s = self.lock();
        Self::record(&mut s, offset, Width::W32, value, true);
        s.file[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }
}

// =============================================================================
// Resource Event Log
// =============================================================================

/// Platform resource events, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Alloc { bus: u64, len: usize },
    Free { bus: u64 },
    IrqRequest,
    IrqRelease,
}

/// Shared, ordered log of platform events
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, e: Event) {
        self.0.lock().unwrap().push(e);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Allocator and IRQ line sharing one event log
pub fn platform() -> (HeapDma, MockIrq, EventLog) {
    let log = EventLog::default();
    (HeapDma::new(log.clone()), MockIrq::new(log.clone()), log)
}

// =============================================================================
// Heap DMA Allocator
// =============================================================================

const DMA_ALIGN: usize = 16;

#[derive(Debug)]
struct Live {
    bus: u64,
    ptr: NonNull<u8>,
    len: usize,
}

#[derive(Debug)]
struct DmaState {
    next_bus: u64,
    count: usize,
    fail_on: Option<usize>,
    short_on: Option<usize>,
    live: Vec<Live>,
    log: EventLog,
}

impl Drop for DmaState {
    fn drop(&mut self) {
        for l in self.live.drain(..) {
            let layout = Layout::from_size_align(l.len, DMA_ALIGN).unwrap();
            // SAFETY: allocated in alloc_coherent with this layout
            unsafe { dealloc(l.ptr.as_ptr(), layout) };
        }
    }
}

/// Heap-backed [`DmaAllocator`] with fake bus addresses.
///
/// Cloning yields another handle to the same allocator so a test can keep
/// inspecting memory after handing a handle to the driver.
#[derive(Debug, Clone)]
pub struct HeapDma {
    state: Arc<Mutex<DmaState>>,
}

// SAFETY: the raw pointers in `Live` are only touched under the mutex
unsafe impl Send for HeapDma {}
// SAFETY: see above
unsafe impl Sync for HeapDma {}

impl HeapDma {
    pub fn new(log: EventLog) -> Self {
        Self {
            state: Arc::new(Mutex::new(DmaState {
                next_bus: 0x1000_0000,
                count: 0,
                fail_on: None,
                short_on: None,
                live: Vec::new(),
                log,
            })),
        }
    }

    /// Make the `n`th allocation (0-based) fail
    pub fn fail_on(&self, n: usize) {
        self.state.lock().unwrap().fail_on = Some(n);
    }

    /// Make the `n`th allocation (0-based) return one byte less than asked
    pub fn short_on(&self, n: usize) {
        self.state.lock().unwrap().short_on = Some(n);
    }

    /// Hand out bus addresses starting at `bus`
    pub fn set_next_bus(&self, bus: u64) {
        self.state.lock().unwrap().next_bus = bus;
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    /// Bus addresses of live allocations, oldest first
    pub fn live_buses(&self) -> Vec<u64> {
        self.state.lock().unwrap().live.iter().map(|l| l.bus).collect()
    }

    /// Copy `bytes` into the live allocation at `bus`
    pub fn write(&self, bus: u64, offset: usize, bytes: &[u8]) {
        let s = self.state.lock().unwrap();
        let l = s.live.iter().find(|l| l.bus == bus).unwrap();
        assert!(offset + bytes.len() <= l.len);
        // SAFETY: bounds checked against the live allocation
        unsafe {
            core::ptr::copy_nonoverlapping(bytes.as_ptr(), l.ptr.as_ptr().add(offset), bytes.len());
        }
    }

    /// Copy `len` bytes out of the live allocation at `bus`
    pub fn read(&self, bus: u64, offset: usize, len: usize) -> Vec<u8> {
        let s = self.state.lock().unwrap();
        let l = s.live.iter().find(|l| l.bus == bus).unwrap();
        assert!(offset + len <= l.len);
        let mut out = vec![0u8; len];
        // SAFETY: bounds checked against the live allocation
        unsafe {
            core::ptr::copy_nonoverlapping(l.ptr.as_ptr().add(offset), out.as_mut_ptr(), len);
        }
        out
    }
}

impl DmaAllocator for HeapDma {
    fn alloc_coherent(&mut self, len: usize) -> DmaResult<DmaRegion> {
        let mut s = self.state.lock().unwrap();
        let n = s.count;
        s.count += 1;
        if s.fail_on == Some(n) {
            return Err(DmaError::AllocationFailed);
        }
        let len = if s.short_on == Some(n) { len - 1 } else { len };

        let layout = Layout::from_size_align(len, DMA_ALIGN).unwrap();
        // SAFETY: layout has non-zero size for every request the driver makes
        let ptr = NonNull::new(unsafe { alloc_zeroed(layout) }).unwrap();
        let bus = s.next_bus;
        s.next_bus += ((len + 0xfff) & !0xfff) as u64;
        s.live.push(Live { bus, ptr, len });
        s.log.push(Event::Alloc { bus, len });

        // SAFETY: ptr is valid for len bytes until free_coherent
        Ok(unsafe { DmaRegion::new(ptr, bus, len) })
    }

    fn free_coherent(&mut self, region: DmaRegion) {
        let mut s = self.state.lock().unwrap();
        let bus = region.bus_addr();
        let idx = s.live.iter().position(|l| l.bus == bus).unwrap();
        let l = s.live.remove(idx);
        assert_eq!(l.ptr.as_ptr(), region.as_ptr());
        let layout = Layout::from_size_align(l.len, DMA_ALIGN).unwrap();
        // SAFETY: allocated in alloc_coherent with this layout
        unsafe { dealloc(l.ptr.as_ptr(), layout) };
        s.log.push(Event::Free { bus });
    }
}

// =============================================================================
// Mock IRQ Line
// =============================================================================

#[derive(Debug, Default)]
struct IrqState {
    fail: bool,
    held: bool,
}

/// [`IrqLine`] that records request/release in the shared event log
#[derive(Debug, Clone)]
pub struct MockIrq {
    state: Arc<Mutex<IrqState>>,
    log: EventLog,
}

impl MockIrq {
    pub fn new(log: EventLog) -> Self {
        Self {
            state: Arc::default(),
            log,
        }
    }

    /// Make the next request fail
    pub fn set_fail(&self, fail: bool) {
        self.state.lock().unwrap().fail = fail;
    }

    pub fn is_held(&self) -> bool {
        self.state.lock().unwrap().held
    }
}

impl IrqLine for MockIrq {
    fn request_shared(&mut self) -> IoResult<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail {
            return Err(IoError::IrqUnavailable);
        }
        assert!(!s.held, "IRQ line requested twice");
        s.held = true;
        self.log.push(Event::IrqRequest);
        Ok(())
    }

    fn release(&mut self) {
        let mut s = self.state.lock().unwrap();
        assert!(s.held, "IRQ line released while not held");
        s.held = false;
        self.log.push(Event::IrqRelease);
    }
}

// =============================================================================
// RX Buffer Helpers
// =============================================================================

/// Write one RX record (header, payload, dummy FCS) at `offset` of the RX
/// buffer at `bus`, wrapping at the buffer end the way the controller does.
/// Returns the offset of the next record.
pub fn write_rx_record(dma: &HeapDma, bus: u64, offset: usize, status: u16, payload: &[u8]) -> usize {
    let size = (payload.len() + ETH_FCS_LEN) as u16;
    let mut record = Vec::with_capacity(RX_HEADER_SIZE + usize::from(size));
    record.extend_from_slice(&status.to_le_bytes());
    record.extend_from_slice(&size.to_le_bytes());
    record.extend_from_slice(payload);
    record.extend_from_slice(&[0xfc; ETH_FCS_LEN]);

    write_wrapping(dma, bus, offset, &record);
    (offset + align4(RX_HEADER_SIZE + usize::from(size))) % RX_BUF_LEN
}

/// Write a bare record header (status, size) at `offset`
pub fn write_rx_header(dma: &HeapDma, bus: u64, offset: usize, status: u16, size: u16) {
    let mut header = [0u8; RX_HEADER_SIZE];
    header[..2].copy_from_slice(&status.to_le_bytes());
    header[2..].copy_from_slice(&size.to_le_bytes());
    write_wrapping(dma, bus, offset, &header);
}

fn write_wrapping(dma: &HeapDma, bus: u64, offset: usize, bytes: &[u8]) {
    let first = bytes.len().min(RX_BUF_LEN - offset);
    dma.write(bus, offset, &bytes[..first]);
    if first < bytes.len() {
        dma.write(bus, 0, &bytes[first..]);
    }
}

/// Deterministic payload of `len` bytes seeded by `seed`
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed)).collect()
}

// =============================================================================
// Recording Network Stack
// =============================================================================

/// [`NetStack`] that records everything it is handed
#[derive(Debug, Default)]
pub struct RecordingStack {
    pub frames: Vec<Vec<u8>>,
    pub links: Vec<LinkEvent>,
    pub wakes: usize,
}

impl RecordingStack {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetStack for RecordingStack {
    fn receive(&mut self, frame: &[u8]) {
        self.frames.push(frame.to_vec());
    }

    fn link_changed(&mut self, event: LinkEvent) {
        self.links.push(event);
    }

    fn wake_queue(&mut self) {
        self.wakes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;

    #[test]
    fn mock_delay_accumulates() {
        let mut delay = MockDelay::new();
        delay.delay_us(3);
        delay.delay_ns(500);
        assert_eq!(delay.total_ns(), 3_500);
        assert_eq!(delay.total_us(), 3);
    }

    #[test]
    fn isr_is_write_one_to_clear() {
        let regs = MockRegisters::new();
        regs.raise(int::ROK | int::TOK);
        regs.write16(ISR, int::ROK);
        assert_eq!(regs.peek16(ISR), int::TOK);
    }

    #[test]
    fn rx_buffer_starts_empty() {
        let regs = MockRegisters::new();
        assert_ne!(regs.read8(CR) & cr::BUFE, 0);
        regs.set_cbr(64);
        assert_eq!(regs.read8(CR) & cr::BUFE, 0);
        regs.write16(CAPR, 64 - 16);
        assert_ne!(regs.read8(CR) & cr::BUFE, 0);
    }

    #[test]
    fn version_bits_survive_tcr_writes() {
        let regs = MockRegisters::with_version(0x7480_0000);
        regs.write32(TCR, 0x0300_0600);
        assert_eq!(regs.peek32(TCR), 0x7780_0600);
    }

    #[test]
    fn heap_dma_logs_and_frees() {
        let (mut dma, _irq, log) = platform();
        let region = dma.alloc_coherent(64).unwrap();
        let bus = region.bus_addr();
        dma.write(bus, 60, &[1, 2, 3, 4]);
        assert_eq!(dma.read(bus, 60, 4), [1, 2, 3, 4]);
        dma.free_coherent(region);
        assert_eq!(dma.live_count(), 0);
        assert_eq!(log.events(), [Event::Alloc { bus, len: 64 }, Event::Free { bus }]);
    }

    #[test]
    fn rx_record_writer_wraps() {
        let (mut dma, _irq, _log) = platform();
        let region = dma.alloc_coherent(RX_BUF_LEN + 16).unwrap();
        let bus = region.bus_addr();
        let payload = pattern(20, 1);
        let next = write_rx_record(&dma, bus, RX_BUF_LEN - 8, 0x0001, &payload);

        assert_eq!(next, (RX_BUF_LEN - 8 + 28) % RX_BUF_LEN);
        assert_eq!(dma.read(bus, RX_BUF_LEN - 8, 4), [0x01, 0x00, 24, 0]);
        assert_eq!(dma.read(bus, RX_BUF_LEN - 4, 4), payload[..4]);
        assert_eq!(dma.read(bus, 0, 16), payload[4..]);
        dma.free_coherent(region);
    }
}
