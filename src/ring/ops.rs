use super::RingError;
use crate::irq::{CriticalSection, InterruptControl};
use crate::memory::Allocator;
use crate::ring::RingBuffer;
use std::sync::atomic::Ordering;

impl<I: InterruptControl, A: Allocator> RingBuffer<I, A> {
    /// Appends all of `data` or nothing.
    ///
    /// Fails with `InsufficientSpace` when fewer than `data.len()` bytes are
    /// free; the buffer is left untouched in that case.
    #[inline]
    pub fn write_buffer(&self, data: &[u8]) -> Result<(), RingError> {
        if data.is_empty() {
            return Err(RingError::InvalidArgument);
        }

        let _cs = CriticalSection::enter(&self.irq);

        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let available = self.free_between(head, tail);

        if data.len() > available {
            return Err(RingError::InsufficientSpace {
                requested: data.len(),
                available,
            });
        }

        // SAFETY: length checked against free space above; single producer.
        unsafe { self.copy_in(head, data) };

        self.head
            .store(self.advance(head, data.len()), Ordering::Release);
        Ok(())
    }

    /// Single-byte write used from the RX interrupt handler.
    ///
    /// Safe to call with interrupts already disabled; it will not re-enable
    /// them.
    #[inline]
    pub fn write_byte(&self, byte: u8) -> Result<(), RingError> {
        let _cs = CriticalSection::enter(&self.irq);

        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if self.free_between(head, tail) == 0 {
            return Err(RingError::InsufficientSpace {
                requested: 1,
                available: 0,
            });
        }

        // SAFETY: at least one slot is free at head; single producer.
        unsafe { self.copy_in(head, &[byte]) };

        self.head.store(self.advance(head, 1), Ordering::Release);
        Ok(())
    }

    /// Fills `out` completely and removes those bytes, or fails without
    /// removing anything.
    #[inline]
    pub fn read_buffer(&self, out: &mut [u8]) -> Result<(), RingError> {
        let _cs = CriticalSection::enter(&self.irq);

        let tail = self.take_checked(out.len())?;

        // SAFETY: take_checked verified out.len() bytes are in use; single consumer.
        unsafe { self.copy_out(tail, out) };

        self.tail
            .store(self.advance(tail, out.len()), Ordering::Release);
        Ok(())
    }

    /// Like `read_buffer` but leaves the bytes in the ring.
    #[inline]
    pub fn peek(&self, out: &mut [u8]) -> Result<(), RingError> {
        let _cs = CriticalSection::enter(&self.irq);

        let tail = self.take_checked(out.len())?;

        // SAFETY: take_checked verified out.len() bytes are in use; single consumer.
        unsafe { self.copy_out(tail, out) };
        Ok(())
    }

    /// Drops `len` bytes from the front, typically after a successful `peek`.
    #[inline]
    pub fn consume(&self, len: usize) -> Result<(), RingError> {
        let _cs = CriticalSection::enter(&self.irq);

        let tail = self.take_checked(len)?;

        self.tail.store(self.advance(tail, len), Ordering::Release);
        Ok(())
    }

    /// Validates a consumer request and returns the current tail.
    #[inline(always)]
    fn take_checked(&self, len: usize) -> Result<usize, RingError> {
        if len == 0 {
            return Err(RingError::InvalidArgument);
        }

        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        let available = self.used_between(head, tail);

        if len > available {
            return Err(RingError::InsufficientData {
                requested: len,
                available,
            });
        }
        Ok(tail)
    }
}
