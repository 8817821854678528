use super::InterruptControl;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug)]
struct IrqState {
    enabled: AtomicBool,
    disables: AtomicU64,
    enables: AtomicU64,
}

/// Host stand-in for the MCU's global interrupt flag.
///
/// Clones share the same flag, so a handle given to a ring buffer can still be
/// inspected (or toggled) by the code that created it.
#[derive(Debug, Clone)]
pub struct SimulatedInterrupts {
    state: Arc<IrqState>,
}

impl Default for SimulatedInterrupts {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SimulatedInterrupts {
    pub fn new(enabled: bool) -> Self {
        Self {
            state: Arc::new(IrqState {
                enabled: AtomicBool::new(enabled),
                disables: AtomicU64::new(0),
                enables: AtomicU64::new(0),
            }),
        }
    }

    /// Number of times interrupts went from enabled to disabled.
    pub fn disable_count(&self) -> u64 {
        self.state.disables.load(Ordering::SeqCst)
    }

    /// Number of times interrupts went from disabled to enabled.
    pub fn enable_count(&self) -> u64 {
        self.state.enables.load(Ordering::SeqCst)
    }
}

impl InterruptControl for SimulatedInterrupts {
    #[inline]
    fn are_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    #[inline]
    fn disable(&self) {
        if self.state.enabled.swap(false, Ordering::SeqCst) {
            self.state.disables.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[inline]
    fn enable(&self) {
        if !self.state.enabled.swap(true, Ordering::SeqCst) {
            self.state.enables.fetch_add(1, Ordering::SeqCst);
        }
    }
}
