use crate::error::FeedError;
use crate::status::FeedStatus;

/// The read/compare/checkpoint contract consumed by lexers and parsers.
///
/// A feed yields elements one at a time. It can run out of data either for
/// now ([`FeedStatus::Exhausted`]) or for good ([`FeedStatus::Finished`]),
/// and its position can be saved and restored at any time.
///
/// ```
/// use feed_framework::{Feed, Stream};
///
/// fn sum(feed: &mut impl Feed<Item = i32>) -> i32 {
///     let mut total = 0;
///     while let Some(v) = feed.next_item() {
///         total += v;
///     }
///     total
/// }
///
/// let mut stream: Stream<i32> = Stream::new();
/// stream.append(vec![1, 2]);
/// stream.append(vec![3, 4]);
/// stream.finish();
/// assert_eq!(sum(&mut stream), 10);
/// assert!(stream.is_finished());
/// ```
pub trait Feed {
    /// Element type.
    type Item;

    /// Saved position, restorable any number of times.
    type Checkpoint: Clone;

    /// Returns the state of the read position.
    fn status(&self) -> FeedStatus;

    /// Returns the current element, or `None` when nothing is available.
    fn peek(&self) -> Option<&Self::Item>;

    /// Returns the current element.
    ///
    /// # Panics
    ///
    /// When checked, if the feed is exhausted or finished.
    #[track_caller]
    fn read(&self) -> &Self::Item;

    /// Moves past the current element.
    ///
    /// # Panics
    ///
    /// When checked, if the feed is exhausted or finished.
    #[track_caller]
    fn advance(&mut self);

    /// Captures the current position.
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Restores a position captured by [`Feed::checkpoint`].
    fn rollback(&mut self, checkpoint: &Self::Checkpoint);

    /// Equivalent of comparing against the "empty" sentinel.
    fn is_exhausted(&self) -> bool {
        self.status().is_exhausted()
    }

    /// Equivalent of comparing against the "end of feed" sentinel.
    fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    /// Checked variant of [`Feed::advance`] that never panics.
    fn try_advance(&mut self) -> Result<(), FeedError> {
        self.status().ready()?;
        self.advance();
        Ok(())
    }

    /// Reads and advances in one step when an element is available.
    fn next_item(&mut self) -> Option<Self::Item>
    where
        Self::Item: Clone,
    {
        let item = self.peek()?.clone();
        self.advance();
        Some(item)
    }
}

/// Elements that can end a line, used for line/column tracking.
pub trait LineBreak {
    /// Returns true if this element ends a line.
    fn is_line_break(&self) -> bool;
}

impl LineBreak for char {
    #[inline]
    fn is_line_break(&self) -> bool {
        *self == '\n'
    }
}

impl LineBreak for u8 {
    #[inline]
    fn is_line_break(&self) -> bool {
        *self == b'\n'
    }
}
