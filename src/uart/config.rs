use super::UartError;

pub const DEFAULT_CPU_HZ: u32 = 16_000_000;
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Largest value the 12-bit UBRR0 pair can hold.
pub const BAUD_REGISTER_MAX: u16 = 0x0FFF;

/// UART line settings. Frames are always 8N1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
    pub cpu_hz: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BAUD_RATE)
    }
}

impl UartConfig {
    pub const fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            cpu_hz: DEFAULT_CPU_HZ,
        }
    }

    pub const fn with_cpu_hz(mut self, cpu_hz: u32) -> Self {
        self.cpu_hz = cpu_hz;
        self
    }

    /// UBRR0 value for normal-speed asynchronous mode:
    /// `round(cpu_hz / (16 * baud)) - 1`.
    pub fn baud_register(&self) -> Result<u16, UartError> {
        if self.baud_rate == 0 {
            return Err(UartError::InvalidArgument);
        }

        let divisor = 16 * self.baud_rate as u64;
        let rounded = (self.cpu_hz as u64 + divisor / 2) / divisor;

        rounded
            .checked_sub(1)
            .filter(|&ubrr| ubrr <= BAUD_REGISTER_MAX as u64)
            .map(|ubrr| ubrr as u16)
            .ok_or(UartError::BaudRateOutOfRange {
                baud_rate: self.baud_rate,
                cpu_hz: self.cpu_hz,
            })
    }
}
