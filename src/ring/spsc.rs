use super::RingError;
use crate::irq::InterruptControl;
use crate::memory::Allocator;
use crate::ring::RingBuffer;

impl<I: InterruptControl, A: Allocator> RingBuffer<I, A> {
    /// Splits the ring into its write half and read half.
    ///
    /// Borrowing the ring mutably for the lifetime of the handles guarantees
    /// there is exactly one producer and one consumer while they exist.
    pub fn split(&mut self) -> (Producer<'_, I, A>, Consumer<'_, I, A>) {
        let ring: &Self = self;
        (Producer { ring }, Consumer { ring })
    }
}

pub struct Producer<'a, I: InterruptControl, A: Allocator> {
    ring: &'a RingBuffer<I, A>,
}

pub struct Consumer<'a, I: InterruptControl, A: Allocator> {
    ring: &'a RingBuffer<I, A>,
}

impl<I: InterruptControl, A: Allocator> Producer<'_, I, A> {
    #[inline]
    pub fn write_buffer(&mut self, data: &[u8]) -> Result<(), RingError> {
        self.ring.write_buffer(data)
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), RingError> {
        self.ring.write_byte(byte)
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.ring.available()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<I: InterruptControl, A: Allocator> Consumer<'_, I, A> {
    #[inline]
    pub fn read_buffer(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        self.ring.read_buffer(out)
    }

    #[inline]
    pub fn peek(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        self.ring.peek(out)
    }

    #[inline]
    pub fn consume(&mut self, len: usize) -> Result<(), RingError> {
        self.ring.consume(len)
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.ring.used()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
