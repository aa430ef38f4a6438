pub mod column;
pub mod deduce;
pub mod error;
pub mod options;
pub mod registry;
pub mod value;

use std::fmt;

/// Handle of an element inside a [`Document`](crate::ui::dom::Document).
///
/// Ids are never reused: once an element is removed its id stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
