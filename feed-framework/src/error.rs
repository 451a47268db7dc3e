use thiserror::Error;

/// Contract violations reported by feeds and streams.
///
/// None of these are runtime conditions: a correct caller never triggers
/// them. Panicking operations use the display text as the panic message,
/// the `try_*` operations hand the value back instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Read or advance on a feed that will never yield data again.
    #[error("feed is finished")]
    Finished,
    /// Read or advance on a feed with no data available yet.
    #[error("feed is exhausted, no data available yet")]
    Exhausted,
    /// Append or finish after the producer already finished the stream.
    #[error("stream is closed, finish() was already called")]
    Closed,
    /// A node received a second successor.
    #[error("node is already linked to a successor")]
    NodeLinked,
    /// A node was finalized twice, or linked after being finalized.
    #[error("node is already final")]
    NodeFinal,
}
