use std::collections::HashSet;

use displaydoc::Display;
use thiserror::Error;

use crate::{id::NodeId, node::Group};

#[derive(Debug, Clone, PartialEq, Eq, Error, Display)]
pub enum ValidateError {
    /// Found a node with an empty id
    EmptyId,
    /// Node id {0} is used more than once
    DuplicateId(NodeId),
}

/// Check a tree built outside the constructors, e.g. one read back from
/// storage, before editing it.
pub fn validate<T>(root: &Group<T>) -> Result<(), ValidateError> {
    let mut seen = HashSet::new();
    for node in root.walk() {
        let id = node.id();
        if id.is_empty() {
            return Err(ValidateError::EmptyId);
        }
        if !seen.insert(id) {
            return Err(ValidateError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn parse(j: &str) -> Group<()> {
        serde_json::from_str::<Node<()>>(j)
            .unwrap()
            .into_group()
            .unwrap()
    }

    #[test]
    fn accepts_unique_ids() {
        let root = parse(
            r#"{ "type": "group", "id": "g", "relation": "and", "children": [
                { "type": "item", "id": "a" },
                { "type": "group", "id": "h", "relation": "or" }
            ] }"#,
        );
        assert_eq!(validate(&root), Ok(()));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let root = parse(
            r#"{ "type": "group", "id": "g", "relation": "and", "children": [
                { "type": "group", "id": "h", "relation": "or", "children": [
                    { "type": "item", "id": "g" }
                ] }
            ] }"#,
        );
        assert_eq!(validate(&root), Err(ValidateError::DuplicateId("g".into())));
    }

    #[test]
    fn rejects_empty_ids() {
        let root = parse(r#"{ "type": "group", "id": "", "relation": "and" }"#);
        let err = validate(&root).unwrap_err();
        assert_eq!(err.to_string(), "Found a node with an empty id");
    }
}
