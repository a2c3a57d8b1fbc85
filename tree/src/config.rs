use serde::{Deserialize, Serialize};

/// What [`move_node`](crate::move_node) does when the node cannot be put
/// back: moving after the root, or into an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovePolicy {
    /// Leave the node detached, dropping it from the tree.
    #[default]
    Drop,
    /// Leave the tree as it was.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub move_policy: MovePolicy,
    /// Relation given to new groups when the caller names none.
    pub default_relation: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            move_policy: MovePolicy::default(),
            default_relation: "and".to_string(),
        }
    }
}
