//! Copy-on-write structural edits.
//!
//! Every edit clones the whole input tree, resolves its targets inside the
//! clone and changes only the clone. A target that cannot be resolved, or
//! has the wrong kind, leaves the clone as it was; nothing here fails.

use crate::{
    config::{EditorConfig, MovePolicy},
    id::{Cuid2Ids, IdSource, NodeId},
    node::{Group, NewNode, NodeKind, NodeRef},
    outcome::{Edited, NoOp, Outcome},
    path::{NodeMut, detach, group_at_mut, locate, node_at, node_at_mut},
};

/// Writable group fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupField {
    Relation(String),
}

/// Writable item fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField<T> {
    Data(Option<T>),
}

/// Applies edits with an injected id source and a [`MovePolicy`].
#[derive(Debug, Clone, Default)]
pub struct Editor<S = Cuid2Ids> {
    ids: S,
    config: EditorConfig,
}

impl Editor<Cuid2Ids> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Editor<S>
where
    S: IdSource,
{
    pub fn with_ids(ids: S) -> Self {
        Self {
            ids,
            config: EditorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_move_policy(mut self, move_policy: MovePolicy) -> Self {
        self.config.move_policy = move_policy;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// A fresh root group using the configured default relation.
    pub fn new_root<T>(&mut self) -> Group<T> {
        Group::new(self.config.default_relation.clone(), &mut self.ids)
    }

    /// A [`NewNode::Group`] using the configured default relation.
    pub fn default_group(&self) -> NewNode {
        NewNode::group(self.config.default_relation.clone())
    }

    /// Append a new child to the end of the group `target`.
    #[tracing::instrument(skip_all, fields(%target, kind = %new_node.kind()))]
    pub fn add_node<T>(&mut self, root: &Group<T>, target: &NodeId, new_node: NewNode) -> Edited<T>
    where
        T: Clone,
    {
        let mut tree = root.clone();
        let Some(path) = locate(&tree, target) else {
            return finish(tree, NoOp::NotFound(target.clone()));
        };
        let outcome = match node_at_mut(&mut tree, &path) {
            Some(NodeMut::Group(group)) => {
                group.children.push(new_node.build(&mut self.ids));
                Outcome::Applied
            }
            Some(NodeMut::Item(_)) => kind_mismatch(target, NodeKind::Group, NodeKind::Item),
            None => NoOp::NotFound(target.clone()).into(),
        };
        finish(tree, outcome)
    }

    /// Remove `target` from its parent. The root is never removed.
    #[tracing::instrument(skip_all, fields(%target))]
    pub fn remove_node<T>(&self, root: &Group<T>, target: &NodeId) -> Edited<T>
    where
        T: Clone,
    {
        let mut tree = root.clone();
        let Some(path) = locate(&tree, target) else {
            return finish(tree, NoOp::NotFound(target.clone()));
        };
        if path.is_empty() {
            return finish(tree, NoOp::Root(target.clone()));
        }
        let outcome = match detach(&mut tree, &path) {
            Some(_) => Outcome::Applied,
            None => NoOp::NotFound(target.clone()).into(),
        };
        finish(tree, outcome)
    }

    /// Move `from` to sit right after `target`, or with `as_child` to the
    /// front of the group `target`.
    ///
    /// The root cannot be moved. When the node cannot be reattached (after
    /// the root, into an item, or into its own subtree) the [`MovePolicy`]
    /// decides between dropping it and leaving the tree alone. Under
    /// [`MovePolicy::Drop`], moving a node after itself puts it at the front
    /// of its parent.
    #[tracing::instrument(skip_all, fields(%from, %target, as_child))]
    pub fn move_node<T>(
        &self,
        root: &Group<T>,
        from: &NodeId,
        target: &NodeId,
        as_child: bool,
    ) -> Edited<T>
    where
        T: Clone,
    {
        let mut tree = root.clone();
        let Some(from_path) = locate(&tree, from) else {
            return finish(tree, NoOp::NotFound(from.clone()));
        };
        let Some(target_path) = locate(&tree, target) else {
            return finish(tree, NoOp::NotFound(target.clone()));
        };
        if from_path.is_empty() {
            return finish(tree, NoOp::Root(from.clone()));
        }
        if target_path.starts_with(&from_path) {
            return self.move_into_self(tree, from, target, &from_path, as_child);
        }

        let reattachable = if as_child {
            matches!(node_at(&tree, &target_path), Some(NodeRef::Group(_)))
        } else {
            !target_path.is_empty()
        };
        if !reattachable && self.config.move_policy == MovePolicy::Reject {
            return finish(tree, NoOp::InvalidTarget(target.clone()));
        }

        let Some(moved) = detach(&mut tree, &from_path) else {
            return finish(tree, NoOp::NotFound(from.clone()));
        };
        if !reattachable {
            return finish(tree, Outcome::Detached(from.clone()));
        }

        // Detaching shifts later siblings, so resolve the target again.
        let Some(target_path) = locate(&tree, target) else {
            return finish(tree, Outcome::Detached(from.clone()));
        };
        let slot = if as_child {
            group_at_mut(&mut tree, &target_path).map(|group| (group, 0))
        } else {
            target_path.split_last().and_then(|(&index, parent)| {
                group_at_mut(&mut tree, parent).map(|group| (group, index + 1))
            })
        };
        let Some((group, index)) = slot else {
            return finish(tree, Outcome::Detached(from.clone()));
        };
        group.children.insert(index, moved);
        finish(tree, Outcome::Applied)
    }

    /// `target` is `from` itself or lies inside its subtree.
    fn move_into_self<T>(
        &self,
        mut tree: Group<T>,
        from: &NodeId,
        target: &NodeId,
        from_path: &[usize],
        as_child: bool,
    ) -> Edited<T> {
        if self.config.move_policy == MovePolicy::Reject {
            let cycle = NoOp::Cycle {
                from: from.clone(),
                target: target.clone(),
            };
            return finish(tree, cycle);
        }
        let Some(moved) = detach(&mut tree, from_path) else {
            return finish(tree, NoOp::NotFound(from.clone()));
        };
        // After itself: the anchor left with the node, so it lands first.
        if !as_child && from == target {
            if let Some((_, parent)) = from_path.split_last() {
                if let Some(group) = group_at_mut(&mut tree, parent) {
                    group.children.insert(0, moved);
                    return finish(tree, Outcome::Applied);
                }
            }
        }
        finish(tree, Outcome::Detached(from.clone()))
    }

    #[tracing::instrument(skip_all, fields(%target))]
    pub fn edit_group<T>(&self, root: &Group<T>, target: &NodeId, field: GroupField) -> Edited<T>
    where
        T: Clone,
    {
        let mut tree = root.clone();
        let outcome = match locate(&tree, target).and_then(|path| node_at_mut(&mut tree, &path)) {
            Some(NodeMut::Group(group)) => {
                match field {
                    GroupField::Relation(relation) => group.relation = relation,
                }
                Outcome::Applied
            }
            Some(NodeMut::Item(_)) => kind_mismatch(target, NodeKind::Group, NodeKind::Item),
            None => NoOp::NotFound(target.clone()).into(),
        };
        finish(tree, outcome)
    }

    #[tracing::instrument(skip_all, fields(%target))]
    pub fn edit_item<T>(&self, root: &Group<T>, target: &NodeId, field: ItemField<T>) -> Edited<T>
    where
        T: Clone,
    {
        let mut tree = root.clone();
        let outcome = match locate(&tree, target).and_then(|path| node_at_mut(&mut tree, &path)) {
            Some(NodeMut::Item(item)) => {
                match field {
                    ItemField::Data(data) => item.data = data,
                }
                Outcome::Applied
            }
            Some(NodeMut::Group(_)) => kind_mismatch(target, NodeKind::Item, NodeKind::Group),
            None => NoOp::NotFound(target.clone()).into(),
        };
        finish(tree, outcome)
    }
}

fn kind_mismatch(id: &NodeId, expected: NodeKind, found: NodeKind) -> Outcome {
    NoOp::KindMismatch {
        id: id.clone(),
        expected,
        found,
    }
    .into()
}

fn finish<T>(tree: Group<T>, outcome: impl Into<Outcome>) -> Edited<T> {
    let outcome = outcome.into();
    match &outcome {
        Outcome::Applied => tracing::trace!("Edit applied"),
        other => tracing::debug!(outcome = %other, "Edit did not apply cleanly"),
    }
    Edited { tree, outcome }
}

/// Copy of `root` with a new child appended to the group `target`.
pub fn add_node<T: Clone>(root: &Group<T>, target: &NodeId, new_node: NewNode) -> Group<T> {
    Editor::new().add_node(root, target, new_node).into_tree()
}

/// Copy of `root` without `target`.
pub fn remove_node<T: Clone>(root: &Group<T>, target: &NodeId) -> Group<T> {
    Editor::new().remove_node(root, target).into_tree()
}

/// Copy of `root` with `from` moved; see [`Editor::move_node`].
pub fn move_node<T: Clone>(
    root: &Group<T>,
    from: &NodeId,
    target: &NodeId,
    as_child: bool,
) -> Group<T> {
    Editor::new()
        .move_node(root, from, target, as_child)
        .into_tree()
}

pub fn edit_group<T: Clone>(root: &Group<T>, target: &NodeId, field: GroupField) -> Group<T> {
    Editor::new().edit_group(root, target, field).into_tree()
}

pub fn edit_item<T: Clone>(root: &Group<T>, target: &NodeId, field: ItemField<T>) -> Group<T> {
    Editor::new().edit_item(root, target, field).into_tree()
}
