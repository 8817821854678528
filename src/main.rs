use clap::Parser;
use ringhal::consumer::ByteSink;
use ringhal::consumer::dispatcher::RxDispatcher;
use ringhal::irq::{InterruptControl, SimulatedInterrupts};
use ringhal::ring::RingBuffer;
use ringhal::uart::registers::RXC0;
use ringhal::uart::{Register, RegisterBlock, Uart, UartConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const GREETING: &[u8] = b"hello from the serial line\r\nring buffers keep bytes in order\r\n";

/// Simulated UART receive path: a line thread raises RX interrupts while the
/// foreground drains the ring buffer.
#[derive(Parser, Debug)]
#[command(name = "ringhal", version)]
struct Args {
    /// RX ring buffer capacity in bytes
    #[arg(short, long, default_value_t = 128)]
    capacity: usize,

    /// Line speed in baud
    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// Foreground poll interval in milliseconds
    #[arg(short, long, default_value_t = 10)]
    poll_ms: u64,
}

/// Logs each complete line received.
struct LineLogger {
    line: Vec<u8>,
    lines: u64,
}

impl LineLogger {
    fn new() -> Self {
        Self {
            line: Vec::new(),
            lines: 0,
        }
    }
}

impl ByteSink for LineLogger {
    fn consume(&mut self, bytes: &[u8]) -> bool {
        for &byte in bytes {
            match byte {
                b'\n' => {
                    log::info!("rx line {}: {}", self.lines, String::from_utf8_lossy(&self.line));
                    self.line.clear();
                    self.lines += 1;
                }
                b'\r' => {}
                _ => self.line.push(byte),
            }
        }
        true
    }

    fn name(&self) -> &str {
        "line-logger"
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("ringhal v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Press Ctrl+C to stop");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        log::info!("Shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let irq = SimulatedInterrupts::new(false);
    let ring = RingBuffer::new(args.capacity, irq.clone())?;
    let config = UartConfig::new(args.baud);
    let regs = RegisterBlock::anonymous()?;
    let uart = Uart::init(&regs, config, &ring)?;

    let mut dispatcher = RxDispatcher::new();
    dispatcher.add_sink(LineLogger::new());
    log::info!("rx sinks: {}", dispatcher.sink_names().join(", "));

    // Ten bit times per 8N1 frame.
    let byte_time = Duration::from_micros(10_000_000 / args.baud as u64);
    let poll = Duration::from_millis(args.poll_ms);

    std::thread::scope(|scope| {
        let line_running = running.clone();
        let uart = &uart;
        let irq = &irq;
        scope.spawn(move || {
            for &byte in GREETING.iter().cycle() {
                if !line_running.load(Ordering::Relaxed) {
                    break;
                }
                uart.registers().simulate_rx(byte);
                // The interrupt stays pending while the foreground masks it.
                while !irq.are_enabled() {
                    std::hint::spin_loop();
                }
                if uart.registers().is_set(Register::Ucsr0a, RXC0) {
                    uart.on_rx_complete();
                }
                std::thread::sleep(byte_time);
            }
        });

        let mut total = 0u64;
        let mut last_report = Instant::now();

        while running.load(Ordering::SeqCst) {
            let stats = dispatcher.drain(&ring);
            total += stats.bytes_read;

            if last_report.elapsed() >= Duration::from_secs(5) {
                log::info!(
                    "[STATUS] total_bytes={} ring_used={} ring_available={} dropped={}",
                    total,
                    ring.used(),
                    ring.available(),
                    uart.dropped()
                );
                last_report = Instant::now();
            }

            std::thread::sleep(poll);
        }

        log::info!("Total bytes received: {}", total);
    });

    uart.deinit();
    Ok(())
}
