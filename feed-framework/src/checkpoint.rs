use std::fmt;
use std::rc::Rc;

use crate::node::Node;

/// A saved [`Stream`](crate::Stream) position.
///
/// The checkpoint holds its own reference to the node it was taken in, so it
/// stays restorable however far the stream or its producer move on. It can be
/// rolled back to any number of times and is freed when dropped.
pub struct Checkpoint<T, C> {
    /// The node the cursor was in.
    pub(crate) node: Rc<Node<T, C>>,
    /// The element index within that node.
    pub(crate) position: usize,
    /// Elements consumed since the start of the stream.
    pub(crate) offset: usize,
}

impl<T, C> Checkpoint<T, C> {
    /// Returns the number of elements consumed before this checkpoint.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<T, C> Clone for Checkpoint<T, C> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
            position: self.position,
            offset: self.offset,
        }
    }
}

impl<T, C> fmt::Debug for Checkpoint<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoint")
            .field("offset", &self.offset)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
