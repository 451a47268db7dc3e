use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::checkpoint::Checkpoint;
use crate::contract;
use crate::error::FeedError;
use crate::node::Node;
use crate::status::FeedStatus;
use crate::traits::Feed;

/// An append-only chain of chunks read through a single live cursor.
///
/// The producer appends chunks with [`Stream::append`] and closes the stream
/// with [`Stream::finish`]. The consumer reads it through the [`Feed`]
/// contract and may capture checkpoints anywhere, including in chunks the
/// live cursor left long ago; appends made after a checkpoint are visible
/// after rolling back to it.
///
/// The cursor never rests at the end of a chunk that has a successor: every
/// operation that moves it (advance, rollback, append) crosses such a
/// boundary right away, so reading never mutates.
///
/// ```
/// use feed_framework::{Feed, FeedStatus, Stream};
///
/// let mut stream: Stream<i32> = Stream::new();
/// stream.append(vec![1, 2]);
/// assert_eq!(stream.next_item(), Some(1));
/// assert_eq!(stream.next_item(), Some(2));
/// assert_eq!(stream.status(), FeedStatus::Exhausted);
///
/// stream.append(vec![3]);
/// stream.finish();
/// assert_eq!(stream.next_item(), Some(3));
/// assert_eq!(stream.status(), FeedStatus::Finished);
/// ```
///
/// A stream has exactly one owner; moving it hands the cursor over and the
/// old binding can no longer be used:
///
/// ```compile_fail
/// use feed_framework::{Feed, Stream};
///
/// let stream: Stream<i32> = Stream::new();
/// let moved = stream;
/// let _ = stream.status();
/// ```
pub struct Stream<T, C = Vec<T>> {
    current: Rc<Node<T, C>>,
    position: usize,
    chunk_end: usize,
    offset: usize,
    appended: usize,
    tail: Rc<Node<T, C>>,
}

impl<T, C> Stream<T, C>
where
    C: AsRef<[T]>,
{
    /// Creates an empty, open stream.
    pub fn new() -> Self {
        let head = Rc::new(Node::placeholder());
        Self {
            tail: Rc::clone(&head),
            current: head,
            position: 0,
            chunk_end: 0,
            offset: 0,
            appended: 0,
        }
    }

    /// Creates a finished stream holding the given chunks.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        let mut stream = Self::new();
        stream.extend(chunks);
        stream.finish();
        stream
    }

    /// Appends a chunk. Empty chunks are skipped.
    ///
    /// If the consumer had run out of data, the cursor moves straight onto
    /// the new chunk.
    ///
    /// # Panics
    ///
    /// If the stream was already finished.
    #[track_caller]
    pub fn append(&mut self, chunk: C) {
        if let Err(err) = self.try_append(chunk) {
            contract::violation("precondition", err);
        }
    }

    /// Appends a chunk, reporting [`FeedError::Closed`] instead of panicking.
    pub fn try_append(&mut self, chunk: C) -> Result<(), FeedError> {
        if self.tail.is_final() {
            return Err(FeedError::Closed);
        }

        let len = chunk.as_ref().len();
        if len == 0 {
            trace!(offset = self.offset, "skipping empty chunk");
            return Ok(());
        }

        let node = Rc::new(Node::with_chunk(chunk));
        self.tail.set_next(Rc::clone(&node))?;
        self.tail = node;
        self.appended += len;
        self.settle();

        trace!(len, buffered = self.buffered(), "appended chunk");
        self.check_invariants();
        Ok(())
    }

    /// Declares that no chunk will ever be appended again.
    ///
    /// # Panics
    ///
    /// If the stream was already finished.
    #[track_caller]
    pub fn finish(&mut self) {
        if let Err(err) = self.try_finish() {
            contract::violation("precondition", err);
        }
    }

    /// Finishes the stream, reporting [`FeedError::Closed`] instead of panicking.
    pub fn try_finish(&mut self) -> Result<(), FeedError> {
        if self.tail.is_final() {
            return Err(FeedError::Closed);
        }
        self.tail.mark_final()?;

        trace!(appended = self.appended, "stream finished");
        Ok(())
    }

    /// Returns true once [`Stream::finish`] has been called.
    pub fn is_closed(&self) -> bool {
        self.tail.is_final()
    }

    /// Returns the number of elements the live cursor has moved past.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of appended elements not yet consumed.
    ///
    /// After a rollback to a checkpoint taken on another stream the offset
    /// belongs to that stream, and this reports 0 rather than underflowing.
    pub fn buffered(&self) -> usize {
        self.appended.saturating_sub(self.offset)
    }

    /// Moves the cursor across chunk boundaries that have a successor.
    /// Returns true if at least one boundary was crossed.
    fn settle(&mut self) -> bool {
        let mut crossed = false;
        while self.position >= self.chunk_end {
            let Some(next) = self.current.next().map(Rc::clone) else {
                break;
            };
            self.current = next;
            self.position = 0;
            self.chunk_end = self.current.len();
            crossed = true;
        }
        crossed
    }

    fn blocked(&self) -> FeedError {
        if self.current.is_final() {
            FeedError::Finished
        } else {
            FeedError::Exhausted
        }
    }

    fn check_invariants(&self) {
        if !contract::CHECK_ASSUMPTIONS {
            return;
        }
        contract::assume(
            self.chunk_end == self.current.len(),
            "cached chunk end matches the current node",
        );
        contract::assume(
            self.position <= self.chunk_end,
            "position lies within the current chunk",
        );
        contract::assume(
            self.position < self.chunk_end || self.current.next().is_none(),
            "cursor never rests on a boundary that has a successor",
        );
        contract::assume(self.tail.next().is_none(), "tail is the end of the chain");
        contract::assume(self.offset <= self.appended, "offset within appended data");
    }
}

impl<T, C> Default for Stream<T, C>
where
    C: AsRef<[T]>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Extend<C> for Stream<T, C>
where
    C: AsRef<[T]>,
{
    fn extend<I: IntoIterator<Item = C>>(&mut self, chunks: I) {
        for chunk in chunks {
            self.append(chunk);
        }
    }
}

impl<T, C> FromIterator<C> for Stream<T, C>
where
    C: AsRef<[T]>,
{
    fn from_iter<I: IntoIterator<Item = C>>(chunks: I) -> Self {
        Self::from_chunks(chunks)
    }
}

impl<T, C> Feed for Stream<T, C>
where
    C: AsRef<[T]>,
{
    type Item = T;
    type Checkpoint = Checkpoint<T, C>;

    fn status(&self) -> FeedStatus {
        if self.position < self.chunk_end {
            FeedStatus::Ready
        } else if self.current.is_final() {
            FeedStatus::Finished
        } else {
            FeedStatus::Exhausted
        }
    }

    #[inline]
    fn peek(&self) -> Option<&T> {
        self.current.elements().get(self.position)
    }

    #[inline]
    #[track_caller]
    fn read(&self) -> &T {
        contract::precondition_with(self.position < self.chunk_end, || self.blocked());
        &self.current.elements()[self.position]
    }

    #[inline]
    #[track_caller]
    fn advance(&mut self) {
        contract::precondition_with(self.position < self.chunk_end, || self.blocked());
        self.position += 1;
        self.offset += 1;
        if self.position == self.chunk_end {
            self.settle();
        }
        self.check_invariants();
    }

    fn checkpoint(&self) -> Checkpoint<T, C> {
        Checkpoint {
            node: Rc::clone(&self.current),
            position: self.position,
            offset: self.offset,
        }
    }

    fn rollback(&mut self, checkpoint: &Checkpoint<T, C>) {
        self.current = Rc::clone(&checkpoint.node);
        self.position = checkpoint.position;
        self.chunk_end = self.current.len();
        self.offset = checkpoint.offset;

        // A checkpoint taken at the end of a chunk before its successor
        // existed has to cross the same boundary advance() would have.
        if self.settle() {
            trace!(offset = self.offset, "rollback crossed a chunk boundary");
        }
        self.check_invariants();
    }
}

impl<T, C> fmt::Debug for Stream<T, C>
where
    C: AsRef<[T]>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("offset", &self.offset)
            .field("buffered", &self.buffered())
            .field("status", &self.status())
            .field("closed", &self.is_closed())
            .finish()
    }
}
