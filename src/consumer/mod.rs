pub mod dispatcher;

/// Destination for bytes drained out of an RX ring.
pub trait ByteSink: Send {
    /// Returns `false` if the sink could not take `bytes`.
    fn consume(&mut self, bytes: &[u8]) -> bool;

    fn flush(&mut self) {}

    fn name(&self) -> &str;
}
