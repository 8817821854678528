use super::RingError;
use crate::irq::InterruptControl;
use crate::memory::{Allocator, SystemHeap};
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Largest usable capacity a ring buffer may be created with.
pub const MAX_CAPACITY: usize = 512;

// With head == tail meaning empty, one slot always stays unused so that a full
// buffer has head one behind tail instead of equal to it.
const SENTINEL_SLOTS: usize = 1;

/// Fixed-capacity circular byte queue shared between one producer and one
/// consumer, typically an interrupt handler and foreground code.
///
/// Every operation takes `&self`. The head index is only ever advanced by the
/// producer (`write_buffer`, `write_byte`) and the tail index only by the
/// consumer (`read_buffer`, `consume`). Two producers running at the same
/// time on one ring are a data race on the head index and the storage, and so
/// are two consumers on the tail. Nothing in the shared `&self` API stops
/// that; use [`RingBuffer::split`] to have the compiler hold you to it.
///
/// Each mutating operation runs inside a [`CriticalSection`] over `I`, which
/// restores the previous interrupt state on return. Masking interrupts keeps
/// an ISR out but does not make host threads wait for each other.
///
/// [`CriticalSection`]: crate::irq::CriticalSection
pub struct RingBuffer<I: InterruptControl, A: Allocator = SystemHeap> {
    pub(super) storage: NonNull<[u8]>,
    // Budget reservation for the control block only; never read.
    pub(super) control: Box<[u8]>,
    pub(super) size: usize,
    pub(super) head: AtomicUsize,
    pub(super) tail: AtomicUsize,
    pub(super) irq: I,
    pub(super) alloc: A,
}

// SAFETY: storage is only reached through raw pointers, and the SPSC discipline
// keeps producer and consumer on disjoint regions. Index hand-off uses
// Release/Acquire pairs.
unsafe impl<I: InterruptControl + Send, A: Allocator + Send> Send for RingBuffer<I, A> {}
unsafe impl<I: InterruptControl + Sync, A: Allocator + Sync> Sync for RingBuffer<I, A> {}

impl<I: InterruptControl> RingBuffer<I, SystemHeap> {
    pub fn new(capacity: usize, irq: I) -> Result<Self, RingError> {
        Self::with_allocator(capacity, irq, SystemHeap)
    }
}

impl<I: InterruptControl, A: Allocator> RingBuffer<I, A> {
    /// Creates a ring able to hold `capacity` bytes, taking its storage and
    /// control block from `alloc`.
    ///
    /// If the control block cannot be allocated the storage is handed back to
    /// `alloc` before returning.
    pub fn with_allocator(capacity: usize, irq: I, alloc: A) -> Result<Self, RingError> {
        if capacity > MAX_CAPACITY {
            return Err(RingError::CapacityExceeded {
                capacity,
                max: MAX_CAPACITY,
            });
        }

        let size = capacity + SENTINEL_SLOTS;
        let storage = alloc
            .allocate(size)
            .ok_or(RingError::AllocationFailed { size })?;

        let control_size = mem::size_of::<Self>();
        let Some(control) = alloc.allocate(control_size) else {
            alloc.free(storage);
            return Err(RingError::AllocationFailed { size: control_size });
        };

        Ok(Self {
            storage: NonNull::from(Box::leak(storage)),
            control,
            size,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            irq,
            alloc,
        })
    }

    /// Usable capacity in bytes.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.size - SENTINEL_SLOTS
    }

    #[inline(always)]
    pub fn used(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        self.used_between(head, tail)
    }

    /// Bytes that can still be written.
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.capacity() - self.used()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.available() == 0
    }

    /// The interrupt capability this ring masks during updates.
    #[inline]
    pub fn interrupts(&self) -> &I {
        &self.irq
    }

    #[cfg(test)]
    pub(crate) fn indices(&self) -> (usize, usize) {
        (
            self.head.load(Ordering::Acquire),
            self.tail.load(Ordering::Acquire),
        )
    }

    #[inline(always)]
    pub(super) fn used_between(&self, head: usize, tail: usize) -> usize {
        (head + self.size - tail) % self.size
    }

    #[inline(always)]
    pub(super) fn free_between(&self, head: usize, tail: usize) -> usize {
        self.size - self.used_between(head, tail) - SENTINEL_SLOTS
    }

    #[inline(always)]
    pub(super) fn advance(&self, index: usize, by: usize) -> usize {
        (index + by) % self.size
    }

    #[inline(always)]
    fn base(&self) -> *mut u8 {
        self.storage.as_ptr() as *mut u8
    }

    /// Copies `data` into storage starting at `head`, wrapping to index 0.
    ///
    /// # Safety
    /// `data.len()` must not exceed the free space behind `head`, and only the
    /// producer may call this.
    #[inline]
    pub(super) unsafe fn copy_in(&self, head: usize, data: &[u8]) {
        let first = data.len().min(self.size - head);
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), self.base().add(head), first);
            if first < data.len() {
                ptr::copy_nonoverlapping(data.as_ptr().add(first), self.base(), data.len() - first);
            }
        }
    }

    /// Copies `out.len()` bytes from storage starting at `tail`, wrapping to
    /// index 0.
    ///
    /// # Safety
    /// `out.len()` must not exceed the bytes in use ahead of `tail`, and only
    /// the consumer may call this.
    #[inline]
    pub(super) unsafe fn copy_out(&self, tail: usize, out: &mut [u8]) {
        let first = out.len().min(self.size - tail);
        unsafe {
            ptr::copy_nonoverlapping(self.base().add(tail), out.as_mut_ptr(), first);
            if first < out.len() {
                ptr::copy_nonoverlapping(
                    self.base(),
                    out.as_mut_ptr().add(first),
                    out.len() - first,
                );
            }
        }
    }
}

impl<I: InterruptControl, A: Allocator> Drop for RingBuffer<I, A> {
    fn drop(&mut self) {
        // SAFETY: storage came from Box::leak in with_allocator and is not
        // reachable once we hold &mut self.
        let storage = unsafe { Box::from_raw(self.storage.as_ptr()) };
        self.alloc.free(storage);
        self.alloc.free(mem::take(&mut self.control));
    }
}

impl<I: InterruptControl, A: Allocator> std::fmt::Debug for RingBuffer<I, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .finish()
    }
}
