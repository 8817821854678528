use super::Allocator;
use std::sync::atomic::{AtomicUsize, Ordering};

#[inline]
fn zeroed(size: usize) -> Option<Box<[u8]>> {
    let mut block = Vec::new();
    block.try_reserve_exact(size).ok()?;
    block.resize(size, 0);
    Some(block.into_boxed_slice())
}

/// The process heap. Fails only if the system allocator refuses the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHeap;

impl Allocator for SystemHeap {
    #[inline]
    fn allocate(&self, size: usize) -> Option<Box<[u8]>> {
        zeroed(size)
    }

    #[inline]
    fn free(&self, block: Box<[u8]>) {
        drop(block);
    }
}

/// A heap with a fixed byte budget, e.g. the 2 KiB of SRAM on an ATmega328P.
///
/// Tracks bytes and blocks in use so that leaks on failure paths show up as
/// non-zero counters.
#[derive(Debug)]
pub struct BoundedHeap {
    limit: usize,
    used: AtomicUsize,
    live: AtomicUsize,
}

impl BoundedHeap {
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
            live: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.used()
    }

    /// Blocks handed out and not yet freed.
    #[inline]
    pub fn live_blocks(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

impl Allocator for BoundedHeap {
    fn allocate(&self, size: usize) -> Option<Box<[u8]>> {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(size).filter(|&total| total <= self.limit)
            })
            .ok()?;

        match zeroed(size) {
            Some(block) => {
                self.live.fetch_add(1, Ordering::AcqRel);
                Some(block)
            }
            None => {
                self.used.fetch_sub(size, Ordering::AcqRel);
                None
            }
        }
    }

    fn free(&self, block: Box<[u8]>) {
        self.used.fetch_sub(block.len(), Ordering::AcqRel);
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}
