use clap::Parser;
use ringhal::irq::SimulatedInterrupts;
use ringhal::ring::{MAX_CAPACITY, RingBuffer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// SPSC stress test over the split producer/consumer handles.
#[derive(Parser, Debug)]
#[command(name = "stress")]
struct Args {
    /// Ring capacity in bytes
    #[arg(short, long, default_value_t = MAX_CAPACITY)]
    capacity: usize,

    /// Bytes per write
    #[arg(short = 'k', long, default_value_t = 16)]
    chunk: usize,

    /// Run time in seconds
    #[arg(short, long, default_value_t = 5)]
    seconds: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("SPSC ring stress test");

    if args.chunk == 0 || args.chunk > args.capacity {
        return Err(format!("chunk must be between 1 and {}", args.capacity).into());
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let mut ring = RingBuffer::new(args.capacity, SimulatedInterrupts::default())?;
    let (mut prod, mut cons) = ring.split();
    let chunk = args.chunk;

    std::thread::scope(|scope| {
        let writer_running = running.clone();
        let writer = scope.spawn(move || {
            let mut written = 0u64;
            let mut data = vec![0u8; chunk];

            while writer_running.load(Ordering::Relaxed) {
                for (i, byte) in data.iter_mut().enumerate() {
                    *byte = (written + i as u64) as u8;
                }
                if prod.write_buffer(&data).is_ok() {
                    written += chunk as u64;
                }
            }

            written
        });

        let reader_running = running.clone();
        let reader = scope.spawn(move || -> Result<u64, String> {
            let mut read = 0u64;
            let mut out = vec![0u8; chunk];

            loop {
                while cons.read_buffer(&mut out).is_ok() {
                    for (i, &byte) in out.iter().enumerate() {
                        let expected = (read + i as u64) as u8;
                        if byte != expected {
                            return Err(format!(
                                "corruption at byte {}: expected {:#04x}, got {:#04x}",
                                read + i as u64,
                                expected,
                                byte
                            ));
                        }
                    }
                    read += chunk as u64;
                }

                if !reader_running.load(Ordering::Relaxed) && cons.is_empty() {
                    break;
                }
            }

            Ok(read)
        });

        log::info!("Running for {} seconds...", args.seconds);
        let start = Instant::now();
        while running.load(Ordering::SeqCst) && start.elapsed() < Duration::from_secs(args.seconds) {
            std::thread::sleep(Duration::from_millis(50));
        }
        running.store(false, Ordering::SeqCst);
        let elapsed = start.elapsed().as_secs_f64();

        let written = writer.join().map_err(|_| "writer thread panicked")?;
        let read = reader.join().map_err(|_| "reader thread panicked")??;

        log::info!("Results:");
        log::info!("  Written to ring: {} bytes", written);
        log::info!("  Read back:       {} bytes", read);
        log::info!(
            "  Throughput:      {:.2} MB/sec",
            written as f64 / elapsed / 1024.0 / 1024.0
        );

        Ok(())
    })
}
