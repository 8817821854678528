pub mod config;
pub mod registers;
pub mod uart_error;

pub use config::UartConfig;
pub use registers::{Register, RegisterBlock};
pub use uart_error::UartError;

use crate::irq::InterruptControl;
use crate::memory::{Allocator, SystemHeap};
use crate::ring::RingBuffer;
use registers::{RXC0, RXCIE0, RXEN0, TXEN0, UCSZ00, UCSZ01, UDRE0};
use std::sync::atomic::{AtomicU64, Ordering};

/// Interrupt-driven UART.
///
/// Received bytes are pushed into a caller-supplied ring buffer by
/// [`Uart::on_rx_complete`], which is the body of the RX complete interrupt;
/// foreground code pulls them out with [`Uart::receive`]. Transmit is polled.
pub struct Uart<'r, I: InterruptControl, A: Allocator = SystemHeap> {
    regs: &'r RegisterBlock,
    rx: &'r RingBuffer<I, A>,
    config: UartConfig,
    dropped: AtomicU64,
}

impl<'r, I: InterruptControl, A: Allocator> Uart<'r, I, A> {
    /// Programs an 8N1 frame at the configured baud rate, enables the
    /// transmitter, receiver and RX complete interrupt, then enables global
    /// interrupts.
    ///
    /// Nothing is written to the registers if the baud rate is unreachable.
    pub fn init(
        regs: &'r RegisterBlock,
        config: UartConfig,
        rx: &'r RingBuffer<I, A>,
    ) -> Result<Self, UartError> {
        let ubrr = config.baud_register()?;

        regs.write(Register::Ucsr0c, UCSZ00 | UCSZ01);
        regs.write(Register::Ubrr0l, (ubrr & 0xFF) as u8);
        regs.write(Register::Ubrr0h, (ubrr >> 8) as u8 & 0x0F);
        regs.write(Register::Ucsr0b, TXEN0 | RXEN0);
        regs.set_bits(Register::Ucsr0b, RXCIE0);

        rx.interrupts().enable();

        log::debug!(
            "uart: init baud={} ubrr={} rx_capacity={}",
            config.baud_rate,
            ubrr,
            rx.capacity()
        );

        Ok(Self {
            regs,
            rx,
            config,
            dropped: AtomicU64::new(0),
        })
    }

    #[inline]
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    #[inline]
    pub fn registers(&self) -> &'r RegisterBlock {
        self.regs
    }

    /// Sends `data`, blocking on the data register between bytes.
    pub fn transmit(&self, data: &[u8]) -> Result<(), UartError> {
        if data.is_empty() {
            return Err(UartError::InvalidArgument);
        }
        if !self.regs.is_set(Register::Ucsr0a, UDRE0) {
            return Err(UartError::DataRegisterBusy);
        }

        for &byte in data {
            self.regs.write(Register::Udr0, byte);
            while !self.regs.is_set(Register::Ucsr0a, UDRE0) {
                std::hint::spin_loop();
            }
        }
        Ok(())
    }

    /// Reads exactly `out.len()` received bytes, or fails without consuming
    /// any.
    #[inline]
    pub fn receive(&self, out: &mut [u8]) -> Result<(), UartError> {
        if out.is_empty() {
            return Err(UartError::InvalidArgument);
        }
        self.rx.read_buffer(out)?;
        Ok(())
    }

    /// Received bytes waiting to be read.
    #[inline]
    pub fn bytes_available(&self) -> usize {
        self.rx.used()
    }

    /// RX complete interrupt body.
    ///
    /// Moves the byte in UDR0 into the ring. If the ring is full the byte is
    /// lost and counted in [`Uart::dropped`]. Returns whether it was stored.
    pub fn on_rx_complete(&self) -> bool {
        let byte = self.regs.read(Register::Udr0);
        self.regs.clear_bits(Register::Ucsr0a, RXC0);

        match self.rx.write_byte(byte) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Bytes lost to RX overflow since init.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Disables the RX interrupt, receiver and transmitter.
    pub fn deinit(self) {
        self.regs
            .clear_bits(Register::Ucsr0b, RXCIE0 | RXEN0 | TXEN0);
        log::debug!("uart: deinit dropped={}", self.dropped());
    }
}
