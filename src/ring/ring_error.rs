use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    #[error("Invalid argument: length must be non-zero")]
    InvalidArgument,

    #[error("Invalid capacity {capacity}: must not exceed {max} bytes")]
    CapacityExceeded { capacity: usize, max: usize },

    #[error("Allocation of {size} bytes failed")]
    AllocationFailed { size: usize },

    #[error(
        "Not enough space in ring buffer: requested {requested} bytes, available {available} bytes"
    )]
    InsufficientSpace { requested: usize, available: usize },

    #[error(
        "Not enough data in ring buffer: requested {requested} bytes, available {available} bytes"
    )]
    InsufficientData { requested: usize, available: usize },
}
