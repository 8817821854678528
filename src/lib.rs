pub mod consumer;
pub mod irq;
pub mod memory;
pub mod ring;
pub mod uart;
