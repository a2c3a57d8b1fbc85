use displaydoc::Display;
use serde::{Deserialize, Serialize};

use crate::id::{Cuid2Ids, IdSource, NodeId, random_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// group
    Group,
    /// item
    Item,
    /// first-placement
    FirstPlacement,
}

/// A condition tree node, tagged on `"type"` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node<T> {
    Group(Group<T>),
    Item(Item<T>),
}

/// A combinator over ordered children, e.g. "and" / "or".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Group<T> {
    pub id: NodeId,
    pub relation: String,
    #[serde(default)]
    pub children: Vec<Node<T>>,
}

/// A leaf condition. The payload is owned by whatever edits expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Item<T> {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Insertion cursor marker for builders. Never part of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "first-placement")]
pub struct FirstPlacement {
    pub id: NodeId,
}

/// What [`add_node`](crate::add_node) appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewNode {
    Group { relation: String },
    Item,
}

impl NewNode {
    pub fn group(relation: impl Into<String>) -> Self {
        Self::Group {
            relation: relation.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NewNode::Group { .. } => NodeKind::Group,
            NewNode::Item => NodeKind::Item,
        }
    }

    pub(crate) fn build<T, S>(self, ids: &mut S) -> Node<T>
    where
        S: IdSource + ?Sized,
    {
        match self {
            NewNode::Group { relation } => Node::Group(Group::new(relation, ids)),
            NewNode::Item => Node::Item(Item::new(ids)),
        }
    }
}

impl<T> Group<T> {
    pub fn new<S>(relation: impl Into<String>, ids: &mut S) -> Self
    where
        S: IdSource + ?Sized,
    {
        Self {
            id: random_id(ids),
            relation: relation.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: impl Into<Node<T>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn node_ref(&self) -> NodeRef<'_, T> {
        NodeRef::Group(self)
    }

    pub(crate) fn child_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|child| child.id() == id)
    }
}

impl<T> Item<T> {
    pub fn new<S>(ids: &mut S) -> Self
    where
        S: IdSource + ?Sized,
    {
        Self {
            id: random_id(ids),
            data: None,
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn node_ref(&self) -> NodeRef<'_, T> {
        NodeRef::Item(self)
    }
}

impl FirstPlacement {
    pub fn new<S>(ids: &mut S) -> Self
    where
        S: IdSource + ?Sized,
    {
        Self { id: random_id(ids) }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::FirstPlacement
    }
}

/// New group with a fresh cuid2 id and no children.
pub fn create_group<T>(relation: impl Into<String>) -> Group<T> {
    Group::new(relation, &mut Cuid2Ids)
}

/// New item with a fresh cuid2 id and no data.
pub fn create_item<T>() -> Item<T> {
    Item::new(&mut Cuid2Ids)
}

impl<T> Node<T> {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Group(group) => &group.id,
            Node::Item(item) => &item.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group(_) => NodeKind::Group,
            Node::Item(_) => NodeKind::Item,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Node::Item(_))
    }

    pub fn as_group(&self) -> Option<&Group<T>> {
        match self {
            Node::Group(group) => Some(group),
            Node::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item<T>> {
        match self {
            Node::Item(item) => Some(item),
            Node::Group(_) => None,
        }
    }

    pub fn into_group(self) -> Option<Group<T>> {
        match self {
            Node::Group(group) => Some(group),
            Node::Item(_) => None,
        }
    }

    pub fn node_ref(&self) -> NodeRef<'_, T> {
        match self {
            Node::Group(group) => NodeRef::Group(group),
            Node::Item(item) => NodeRef::Item(item),
        }
    }
}

impl<T> From<Group<T>> for Node<T> {
    fn from(value: Group<T>) -> Self {
        Node::Group(value)
    }
}

impl<T> From<Item<T>> for Node<T> {
    fn from(value: Item<T>) -> Self {
        Node::Item(value)
    }
}

/// Borrowed view of a node, so a bare [`Group`] root can be reported
/// alongside nested nodes.
#[derive(Debug, PartialEq)]
pub enum NodeRef<'a, T> {
    Group(&'a Group<T>),
    Item(&'a Item<T>),
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub fn id(self) -> &'a NodeId {
        match self {
            NodeRef::Group(group) => &group.id,
            NodeRef::Item(item) => &item.id,
        }
    }

    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Group(_) => NodeKind::Group,
            NodeRef::Item(_) => NodeKind::Item,
        }
    }

    pub fn as_group(self) -> Option<&'a Group<T>> {
        match self {
            NodeRef::Group(group) => Some(group),
            NodeRef::Item(_) => None,
        }
    }

    pub fn as_item(self) -> Option<&'a Item<T>> {
        match self {
            NodeRef::Item(item) => Some(item),
            NodeRef::Group(_) => None,
        }
    }

    pub fn to_node(self) -> Node<T>
    where
        T: Clone,
    {
        match self {
            NodeRef::Group(group) => Node::Group(group.clone()),
            NodeRef::Item(item) => Node::Item(item.clone()),
        }
    }
}
