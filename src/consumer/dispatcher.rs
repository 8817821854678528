use super::ByteSink;
use crate::irq::InterruptControl;
use crate::memory::Allocator;
use crate::ring::{Consumer, RingBuffer, RingError};

/// Largest slice handed to sinks in one call.
pub const CHUNK_SIZE: usize = 64;

/// Read side used by the dispatcher; either the whole ring or its consumer half.
trait DrainSource {
    fn used(&self) -> usize;
    fn peek(&mut self, out: &mut [u8]) -> Result<(), RingError>;
    fn consume(&mut self, len: usize) -> Result<(), RingError>;
}

impl<I: InterruptControl, A: Allocator> DrainSource for &RingBuffer<I, A> {
    fn used(&self) -> usize {
        (**self).used()
    }

    fn peek(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        (**self).peek(out)
    }

    fn consume(&mut self, len: usize) -> Result<(), RingError> {
        (**self).consume(len)
    }
}

impl<I: InterruptControl, A: Allocator> DrainSource for &mut Consumer<'_, I, A> {
    fn used(&self) -> usize {
        (**self).used()
    }

    fn peek(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        (**self).peek(out)
    }

    fn consume(&mut self, len: usize) -> Result<(), RingError> {
        (**self).consume(len)
    }
}

/// Moves received bytes from a ring to every registered sink.
///
/// Each chunk is peeked, offered to all sinks, and only consumed once at least
/// one sink accepted it. A chunk nobody takes stays in the ring and ends the
/// drain, so it is offered again next time.
pub struct RxDispatcher {
    sinks: Vec<Box<dyn ByteSink>>,
}

impl Default for RxDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RxDispatcher {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink<S: ByteSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Sink names in delivery order.
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    #[inline]
    pub fn drain<I: InterruptControl, A: Allocator>(
        &mut self,
        ring: &RingBuffer<I, A>,
    ) -> DrainStats {
        let stats = self.drain_from(ring, usize::MAX);
        self.flush();
        stats
    }

    #[inline]
    pub fn drain_consumer<I: InterruptControl, A: Allocator>(
        &mut self,
        consumer: &mut Consumer<'_, I, A>,
    ) -> DrainStats {
        let stats = self.drain_from(consumer, usize::MAX);
        self.flush();
        stats
    }

    /// Drains at most `max_chunks` chunks without flushing sinks.
    #[inline]
    pub fn drain_batch<I: InterruptControl, A: Allocator>(
        &mut self,
        ring: &RingBuffer<I, A>,
        max_chunks: usize,
    ) -> DrainStats {
        self.drain_from(ring, max_chunks)
    }

    fn drain_from<S: DrainSource>(&mut self, mut source: S, max_chunks: usize) -> DrainStats {
        let mut stats = DrainStats::default();
        let mut chunk = [0u8; CHUNK_SIZE];

        for _ in 0..max_chunks {
            let len = source.used().min(CHUNK_SIZE);
            if len == 0 {
                break;
            }
            let bytes = &mut chunk[..len];
            if source.peek(bytes).is_err() {
                break;
            }

            let mut accepted = false;
            for sink in &mut self.sinks {
                if sink.consume(bytes) {
                    stats.chunks_delivered += 1;
                    accepted = true;
                } else {
                    log::trace!("rx: sink {} rejected {} bytes", sink.name(), len);
                    stats.chunks_failed += 1;
                }
            }

            if !accepted {
                log::trace!("rx: no sink accepted {} bytes, holding", len);
                break;
            }
            if source.consume(len).is_err() {
                break;
            }
            stats.bytes_read += len as u64;
        }
        stats
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DrainStats {
    pub bytes_read: u64,
    pub chunks_delivered: u64,
    pub chunks_failed: u64,
}

impl DrainStats {
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.chunks_delivered + self.chunks_failed;
        if total == 0 {
            1.0
        } else {
            self.chunks_delivered as f64 / total as f64
        }
    }
}
