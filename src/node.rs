use serde::Serialize;

use crate::id::Id;

/// A vertex as it appears in a snapshot.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Serialize)]
pub enum Node<I> {
    /// The extra source Johnson's algorithm adds to compute potentials.
    Virtual,
    WithId(I),
}

impl<I> Node<I> {
    pub fn id(&self) -> Option<&I> {
        match self {
            Node::Virtual => None,
            Node::WithId(id) => Some(id),
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, Node::Virtual)
    }
}

impl<I> From<I> for Node<I>
where
    I: Id,
{
    fn from(id: I) -> Self {
        Self::WithId(id)
    }
}
