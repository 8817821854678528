pub mod simulated;

pub use simulated::SimulatedInterrupts;

/// Global interrupt masking, implemented by the platform layer.
pub trait InterruptControl {
    /// Whether global interrupts are currently enabled.
    fn are_enabled(&self) -> bool;

    fn disable(&self);

    fn enable(&self);
}

impl<T: InterruptControl + ?Sized> InterruptControl for &T {
    #[inline(always)]
    fn are_enabled(&self) -> bool {
        (**self).are_enabled()
    }

    #[inline(always)]
    fn disable(&self) {
        (**self).disable()
    }

    #[inline(always)]
    fn enable(&self) {
        (**self).enable()
    }
}

/// Scoped interrupt suppression.
///
/// Disables interrupts on entry only if they were enabled, and on drop
/// re-enables them only if this guard was the one that disabled them. Safe to
/// enter from an interrupt handler, where interrupts are already masked.
///
/// Not reentrant in the sense of nesting counts: the innermost guard simply
/// observes interrupts as disabled and leaves them alone.
pub struct CriticalSection<'a, I: InterruptControl + ?Sized> {
    irq: &'a I,
    restore: bool,
}

impl<'a, I: InterruptControl + ?Sized> CriticalSection<'a, I> {
    #[inline(always)]
    pub fn enter(irq: &'a I) -> Self {
        let restore = irq.are_enabled();
        if restore {
            irq.disable();
        }
        Self { irq, restore }
    }

    /// True if leaving this section will re-enable interrupts.
    #[inline]
    pub fn will_restore(&self) -> bool {
        self.restore
    }
}

impl<I: InterruptControl + ?Sized> Drop for CriticalSection<'_, I> {
    #[inline(always)]
    fn drop(&mut self) {
        if self.restore {
            self.irq.enable();
        }
    }
}
