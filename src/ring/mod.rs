pub mod buffer;
pub mod ops;
pub mod ring_error;
pub mod spsc;

pub use buffer::{MAX_CAPACITY, RingBuffer};
pub use ring_error::*;
pub use spsc::*;
