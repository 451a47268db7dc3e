use crate::contract;
use crate::error::FeedError;
use crate::status::FeedStatus;
use crate::traits::Feed;

/// A feed over data that is already complete.
///
/// Wraps any cloneable iterator: cloning the iterator is the saved position,
/// so checkpoints cost one clone and no chunk chain is involved. A range feed
/// is never merely exhausted, once the data runs out it is finished.
///
/// ```
/// use feed_framework::{adapt_range, Feed};
///
/// let mut feed = adapt_range("let".chars());
/// let start = feed.checkpoint();
/// assert_eq!(feed.next_item(), Some('l'));
/// feed.rollback(&start);
/// assert_eq!(feed.read(), &'l');
/// ```
#[derive(Debug, Clone)]
pub struct RangeFeed<I>
where
    I: Iterator,
{
    rest: I,
    current: Option<I::Item>,
}

/// A saved [`RangeFeed`] position.
#[derive(Debug, Clone)]
pub struct RangeCheckpoint<I>
where
    I: Iterator,
{
    rest: I,
    current: Option<I::Item>,
}

impl<I> RangeFeed<I>
where
    I: Iterator,
{
    /// Wraps `iter`, pulling its first element as the current one.
    pub fn new(mut iter: I) -> Self {
        let current = iter.next();
        Self { rest: iter, current }
    }
}

/// Adapts a complete range, such as a `Vec`, an array or `str::chars()`.
pub fn adapt_range<R>(range: R) -> RangeFeed<R::IntoIter>
where
    R: IntoIterator,
    R::IntoIter: Clone,
{
    RangeFeed::new(range.into_iter())
}

impl<I> Feed for RangeFeed<I>
where
    I: Iterator + Clone,
    I::Item: Clone,
{
    type Item = I::Item;
    type Checkpoint = RangeCheckpoint<I>;

    fn status(&self) -> FeedStatus {
        match self.current {
            Some(_) => FeedStatus::Ready,
            None => FeedStatus::Finished,
        }
    }

    #[inline]
    fn peek(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }

    #[inline]
    #[track_caller]
    fn read(&self) -> &I::Item {
        match &self.current {
            Some(item) => item,
            None => contract::violation("precondition", FeedError::Finished),
        }
    }

    #[inline]
    #[track_caller]
    fn advance(&mut self) {
        contract::precondition(self.current.is_some(), FeedError::Finished);
        self.current = self.rest.next();
    }

    fn checkpoint(&self) -> RangeCheckpoint<I> {
        RangeCheckpoint {
            rest: self.rest.clone(),
            current: self.current.clone(),
        }
    }

    fn rollback(&mut self, checkpoint: &RangeCheckpoint<I>) {
        self.rest = checkpoint.rest.clone();
        self.current = checkpoint.current.clone();
    }
}
