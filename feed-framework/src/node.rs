use std::cell::OnceCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::FeedError;

/// What follows a node once the producer has decided.
///
/// The successor cell starts empty (the node is the open tail) and is written
/// exactly once: either a link to the next node or the final marker.
pub(crate) enum Successor<T, C> {
    Next(Rc<Node<T, C>>),
    Final,
}

/// One link of the chunk chain.
///
/// Nodes are shared between the live cursor, the producer's tail and every
/// outstanding checkpoint. The data never changes after construction.
pub(crate) struct Node<T, C> {
    data: Option<C>,
    successor: OnceCell<Successor<T, C>>,
    _marker: PhantomData<T>,
}

impl<T, C> Node<T, C>
where
    C: AsRef<[T]>,
{
    /// Creates the empty placeholder that heads every chain.
    pub(crate) fn placeholder() -> Self {
        Self {
            data: None,
            successor: OnceCell::new(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn with_chunk(chunk: C) -> Self {
        Self {
            data: Some(chunk),
            successor: OnceCell::new(),
            _marker: PhantomData,
        }
    }

    /// The node's elements, empty for the placeholder.
    #[inline]
    pub(crate) fn elements(&self) -> &[T] {
        match &self.data {
            Some(chunk) => chunk.as_ref(),
            None => &[],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.elements().len()
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<&Rc<Node<T, C>>> {
        match self.successor.get() {
            Some(Successor::Next(node)) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_final(&self) -> bool {
        matches!(self.successor.get(), Some(Successor::Final))
    }

    /// Links `next` after this node.
    pub(crate) fn set_next(&self, next: Rc<Node<T, C>>) -> Result<(), FeedError> {
        self.settle(Successor::Next(next))
    }

    /// Marks this node as the last one of the chain.
    pub(crate) fn mark_final(&self) -> Result<(), FeedError> {
        self.settle(Successor::Final)
    }

    fn settle(&self, successor: Successor<T, C>) -> Result<(), FeedError> {
        self.successor.set(successor).map_err(|_| match self.successor.get() {
            Some(Successor::Final) => FeedError::NodeFinal,
            _ => FeedError::NodeLinked,
        })
    }
}

impl<T, C> Drop for Node<T, C> {
    fn drop(&mut self) {
        // Unlink iteratively so a long chain does not recurse once per node.
        let mut successor = self.successor.take();
        while let Some(Successor::Next(node)) = successor {
            match Rc::try_unwrap(node) {
                Ok(mut node) => successor = node.successor.take(),
                Err(_) => break,
            }
        }
    }
}
