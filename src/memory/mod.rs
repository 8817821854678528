pub mod heap;

pub use heap::{BoundedHeap, SystemHeap};

/// Byte-block allocator used to obtain ring storage.
pub trait Allocator {
    /// Returns a zeroed block of exactly `size` bytes, or `None` if the
    /// request cannot be satisfied.
    fn allocate(&self, size: usize) -> Option<Box<[u8]>>;

    /// Returns a block previously handed out by `allocate`.
    fn free(&self, block: Box<[u8]>);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, size: usize) -> Option<Box<[u8]>> {
        (**self).allocate(size)
    }

    #[inline]
    fn free(&self, block: Box<[u8]>) {
        (**self).free(block)
    }
}
