use crate::{
    id::NodeId,
    node::{Group, Node, NodeRef},
};

/// A node located by [`find_node`], with its immediate parent.
///
/// `parent` is `None` only when the match is the node the search started
/// from.
#[derive(Debug)]
pub struct Found<'a, T> {
    pub node: NodeRef<'a, T>,
    pub parent: Option<&'a Group<T>>,
}

impl<T> Clone for Found<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Found<'_, T> {}

/// Depth-first, pre-order search for `target`.
///
/// The root's own id is checked first, then children of each group in
/// order. The first match wins.
pub fn find_node<'a, T>(root: &'a Group<T>, target: &NodeId) -> Option<Found<'a, T>> {
    find_from(root.node_ref(), target, None)
}

fn find_from<'a, T>(
    node: NodeRef<'a, T>,
    target: &NodeId,
    parent: Option<&'a Group<T>>,
) -> Option<Found<'a, T>> {
    if node.id() == target {
        return Some(Found { node, parent });
    }
    let NodeRef::Group(group) = node else {
        return None;
    };
    group
        .children
        .iter()
        .find_map(|child| find_from(child.node_ref(), target, Some(group)))
}

/// Whether `target` lies strictly inside the subtree of the group
/// `ancestor`. A node is never its own descendant, and items have none.
pub fn is_descendant<T>(root: &Group<T>, ancestor: &NodeId, target: &NodeId) -> bool {
    if ancestor == target {
        return false;
    }
    let Some(group) = find_node(root, ancestor).and_then(|found| found.node.as_group()) else {
        return false;
    };
    find_node(group, target).is_some()
}

/// Whether `target` exists and has no parent.
pub fn is_root<T>(root: &Group<T>, target: &NodeId) -> bool {
    find_node(root, target).is_some_and(|found| found.parent.is_none())
}

impl<T> Group<T> {
    pub fn find(&self, target: &NodeId) -> Option<Found<'_, T>> {
        find_node(self, target)
    }

    pub fn walk(&self) -> Walk<'_, T> {
        walk(self.node_ref())
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}

impl<T> Node<T> {
    pub fn find(&self, target: &NodeId) -> Option<Found<'_, T>> {
        find_from(self.node_ref(), target, None)
    }

    pub fn walk(&self) -> Walk<'_, T> {
        walk(self.node_ref())
    }
}

/// Pre-order traversal starting at `start`.
pub fn walk<T>(start: NodeRef<'_, T>) -> Walk<'_, T> {
    Walk { stack: vec![start] }
}

#[derive(Debug)]
pub struct Walk<'a, T> {
    stack: Vec<NodeRef<'a, T>>,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let NodeRef::Group(group) = node {
            self.stack
                .extend(group.children.iter().rev().map(Node::node_ref));
        }
        Some(node)
    }
}
