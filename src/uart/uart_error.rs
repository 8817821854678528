use crate::ring::RingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UartError {
    #[error("Invalid argument")]
    InvalidArgument,

    #[error("Baud rate {baud_rate} cannot be generated from a {cpu_hz} Hz clock")]
    BaudRateOutOfRange { baud_rate: u32, cpu_hz: u32 },

    #[error("Transmit data register is not empty")]
    DataRegisterBusy,

    #[error("RX buffer: {0}")]
    Ring(#[from] RingError),
}
