use displaydoc::Display;

use crate::{
    id::NodeId,
    node::{Group, NodeKind},
};

/// What an edit did to its copy of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Outcome {
    /// applied
    Applied,
    /// detached {0} without reattaching it
    Detached(NodeId),
    /// nothing changed: {0}
    NoOp(NoOp),
}

/// Why an edit left its copy untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum NoOp {
    /// node {0} not found
    NotFound(NodeId),
    /// node {id} is of kind {found}, expected {expected}
    KindMismatch {
        id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },
    /// node {0} is the root
    Root(NodeId),
    /// node {0} cannot take the moved node
    InvalidTarget(NodeId),
    /// node {target} is inside the subtree of {from}
    Cycle { from: NodeId, target: NodeId },
}

impl From<NoOp> for Outcome {
    fn from(value: NoOp) -> Self {
        Outcome::NoOp(value)
    }
}

impl Outcome {
    /// Whether the returned tree differs from the input.
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::NoOp(_))
    }
}

/// A freshly copied tree together with what was done to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edited<T> {
    pub tree: Group<T>,
    pub outcome: Outcome,
}

impl<T> Edited<T> {
    pub fn into_tree(self) -> Group<T> {
        self.tree
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}
