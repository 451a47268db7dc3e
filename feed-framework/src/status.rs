use crate::error::FeedError;

/// Observable state of a feed's read position.
///
/// `Finished` implies exhausted: a consumer that waits on `Exhausted` must
/// stop on `Finished` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedStatus {
    /// An element is available for reading.
    Ready,
    /// No element available right now, more may arrive.
    Exhausted,
    /// No element will ever be available again.
    Finished,
}

impl FeedStatus {
    /// Returns true if there is nothing to read at the moment.
    pub fn is_exhausted(self) -> bool {
        !matches!(self, FeedStatus::Ready)
    }

    /// Returns true if there is nothing to read, ever.
    pub fn is_finished(self) -> bool {
        matches!(self, FeedStatus::Finished)
    }

    /// Converts a non-ready status into the matching error.
    pub fn ready(self) -> Result<(), FeedError> {
        match self {
            FeedStatus::Ready => Ok(()),
            FeedStatus::Exhausted => Err(FeedError::Exhausted),
            FeedStatus::Finished => Err(FeedError::Finished),
        }
    }
}
