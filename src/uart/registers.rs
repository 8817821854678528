//! USART0 register window.
//!
//! Offsets and bit positions follow the ATmega328P data-space layout, relative
//! to UCSR0A at 0xC0. On the host the window is an anonymous mapping so the
//! driver can be exercised without hardware.

use memmap2::MmapMut;
use std::io;
use std::ptr;

pub const WINDOW_BASE: usize = 0xC0;
const WINDOW_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Register {
    Ucsr0a = 0xC0,
    Ucsr0b = 0xC1,
    Ucsr0c = 0xC2,
    Ubrr0l = 0xC4,
    Ubrr0h = 0xC5,
    Udr0 = 0xC6,
}

impl Register {
    #[inline(always)]
    const fn offset(self) -> usize {
        self as usize - WINDOW_BASE
    }
}

// UCSR0A
pub const RXC0: u8 = 1 << 7;
pub const UDRE0: u8 = 1 << 5;

// UCSR0B
pub const RXCIE0: u8 = 1 << 7;
pub const RXEN0: u8 = 1 << 4;
pub const TXEN0: u8 = 1 << 3;

// UCSR0C
pub const UCSZ01: u8 = 1 << 2;
pub const UCSZ00: u8 = 1 << 1;

const UCSR0A_RESET: u8 = UDRE0;
const UCSR0C_RESET: u8 = UCSZ01 | UCSZ00;

/// Volatile byte access to the USART0 registers.
///
/// The line side and the driver may touch the window from different contexts,
/// so every access goes through a raw pointer with volatile semantics.
pub struct RegisterBlock {
    _map: MmapMut,
    base: *mut u8,
}

// SAFETY: all access is volatile byte-wide through `base`, which stays valid
// for as long as `_map` is alive.
unsafe impl Send for RegisterBlock {}
unsafe impl Sync for RegisterBlock {}

impl RegisterBlock {
    /// Maps a fresh window holding the hardware reset values.
    pub fn anonymous() -> io::Result<Self> {
        let mut map = MmapMut::map_anon(WINDOW_LEN)?;
        let base = map.as_mut_ptr();
        let regs = Self { _map: map, base };

        regs.write(Register::Ucsr0a, UCSR0A_RESET);
        regs.write(Register::Ucsr0c, UCSR0C_RESET);
        Ok(regs)
    }

    #[inline(always)]
    pub fn read(&self, reg: Register) -> u8 {
        // SAFETY: offset is inside the mapped window.
        unsafe { ptr::read_volatile(self.base.add(reg.offset())) }
    }

    #[inline(always)]
    pub fn write(&self, reg: Register, value: u8) {
        // SAFETY: offset is inside the mapped window.
        unsafe { ptr::write_volatile(self.base.add(reg.offset()), value) }
    }

    #[inline]
    pub fn set_bits(&self, reg: Register, mask: u8) {
        self.write(reg, self.read(reg) | mask);
    }

    #[inline]
    pub fn clear_bits(&self, reg: Register, mask: u8) {
        self.write(reg, self.read(reg) & !mask);
    }

    #[inline]
    pub fn is_set(&self, reg: Register, mask: u8) -> bool {
        self.read(reg) & mask == mask
    }

    /// Line side: latches a received byte and raises RX complete.
    pub fn simulate_rx(&self, byte: u8) {
        self.write(Register::Udr0, byte);
        self.set_bits(Register::Ucsr0a, RXC0);
    }
}
