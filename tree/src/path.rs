//! Child-index paths into a tree, for edits that need mutable access.

use crate::{
    id::NodeId,
    node::{Group, Item, Node, NodeRef},
};

/// Child indices from the root down to a node. Empty for the root.
pub(crate) type NodePath = Vec<usize>;

pub(crate) enum NodeMut<'a, T> {
    Group(&'a mut Group<T>),
    Item(&'a mut Item<T>),
}

/// Pre-order search, same visiting order as [`find_node`](crate::find_node).
pub(crate) fn locate<T>(root: &Group<T>, target: &NodeId) -> Option<NodePath> {
    fn descend<T>(group: &Group<T>, target: &NodeId, path: &mut NodePath) -> bool {
        for (index, child) in group.children.iter().enumerate() {
            path.push(index);
            if child.id() == target {
                return true;
            }
            if let Node::Group(child) = child {
                if descend(child, target, path) {
                    return true;
                }
            }
            path.pop();
        }
        false
    }

    if &root.id == target {
        return Some(NodePath::new());
    }
    let mut path = NodePath::new();
    descend(root, target, &mut path).then_some(path)
}

pub(crate) fn node_at<'a, T>(root: &'a Group<T>, path: &[usize]) -> Option<NodeRef<'a, T>> {
    let mut node = root.node_ref();
    for &index in path {
        node = node.as_group()?.children.get(index)?.node_ref();
    }
    Some(node)
}

pub(crate) fn group_at_mut<'a, T>(
    root: &'a mut Group<T>,
    path: &[usize],
) -> Option<&'a mut Group<T>> {
    let mut group = root;
    for &index in path {
        match group.children.get_mut(index)? {
            Node::Group(child) => group = child,
            Node::Item(_) => return None,
        }
    }
    Some(group)
}

pub(crate) fn node_at_mut<'a, T>(
    root: &'a mut Group<T>,
    path: &[usize],
) -> Option<NodeMut<'a, T>> {
    let Some((&index, parent)) = path.split_last() else {
        return Some(NodeMut::Group(root));
    };
    match group_at_mut(root, parent)?.children.get_mut(index)? {
        Node::Group(group) => Some(NodeMut::Group(group)),
        Node::Item(item) => Some(NodeMut::Item(item)),
    }
}

/// Take the node at `path` out of its parent. The root cannot be detached.
pub(crate) fn detach<T>(root: &mut Group<T>, path: &[usize]) -> Option<Node<T>> {
    let (&index, parent) = path.split_last()?;
    let parent = group_at_mut(root, parent)?;
    (index < parent.children.len()).then(|| parent.children.remove(index))
}
