use crate::position::Position;
use crate::status::FeedStatus;
use crate::traits::{Feed, LineBreak};

/// A feed wrapper that keeps track of line and column.
///
/// Checkpoints save the position along with the inner checkpoint, so a
/// rollback puts both back.
///
/// ```
/// use feed_framework::{adapt_range, Feed, Position, Tracked};
///
/// let mut feed = Tracked::new(adapt_range("a\nb".chars()));
/// feed.advance();
/// feed.advance();
/// assert_eq!(feed.position(), Position::at(2, 1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Tracked<F> {
    inner: F,
    position: Position,
}

/// A saved [`Tracked`] position.
#[derive(Debug, Clone)]
pub struct TrackedCheckpoint<C> {
    inner: C,
    position: Position,
}

impl<C> TrackedCheckpoint<C> {
    /// Returns the position stored in this checkpoint.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl<F> Tracked<F> {
    /// Starts tracking at line 1, column 1.
    pub fn new(inner: F) -> Self {
        Self::with_position(inner, Position::new())
    }

    /// Starts tracking at a known position, e.g. a feed resumed mid-file.
    pub fn with_position(inner: F, position: Position) -> Self {
        Self { inner, position }
    }

    /// Returns the current position.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Gives mutable access to the wrapped feed, e.g. to append to a stream.
    ///
    /// Moving the wrapped feed's cursor through this reference desynchronizes
    /// the tracked position.
    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.inner
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F> Feed for Tracked<F>
where
    F: Feed,
    F::Item: LineBreak,
{
    type Item = F::Item;
    type Checkpoint = TrackedCheckpoint<F::Checkpoint>;

    fn status(&self) -> FeedStatus {
        self.inner.status()
    }

    #[inline]
    fn peek(&self) -> Option<&F::Item> {
        self.inner.peek()
    }

    #[inline]
    #[track_caller]
    fn read(&self) -> &F::Item {
        self.inner.read()
    }

    #[track_caller]
    fn advance(&mut self) {
        self.position.step(self.inner.read());
        self.inner.advance();
    }

    fn checkpoint(&self) -> Self::Checkpoint {
        TrackedCheckpoint {
            inner: self.inner.checkpoint(),
            position: self.position,
        }
    }

    fn rollback(&mut self, checkpoint: &Self::Checkpoint) {
        self.inner.rollback(&checkpoint.inner);
        self.position = checkpoint.position;
    }
}
