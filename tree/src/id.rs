use std::{
    convert::Infallible,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Source of raw tokens for new node ids.
///
/// Tokens only need to be unique within one document; nothing here is
/// cryptographically secure.
pub trait IdSource {
    fn next_token(&mut self) -> String;
}

/// Collision-resistant tokens from [`cuid2`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Cuid2Ids;

impl IdSource for Cuid2Ids {
    fn next_token(&mut self) -> String {
        cuid2::create_id()
    }
}

/// Deterministic `{prefix}{n}` tokens, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("n")
    }
}

impl IdSource for SequentialIds {
    fn next_token(&mut self) -> String {
        let token = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        token
    }
}

impl<S: IdSource + ?Sized> IdSource for &mut S {
    fn next_token(&mut self) -> String {
        (**self).next_token()
    }
}

impl<S: IdSource + ?Sized> IdSource for Box<S> {
    fn next_token(&mut self) -> String {
        (**self).next_token()
    }
}

/// Draw a node id from `source`, skipping empty tokens.
pub fn random_id<S: IdSource + ?Sized>(source: &mut S) -> NodeId {
    loop {
        let token = source.next_token();
        if !token.is_empty() {
            return NodeId(token);
        }
        tracing::trace!("Id source produced an empty token, retrying");
    }
}

/// Draw a node id from the default [`Cuid2Ids`] source.
pub fn random() -> NodeId {
    random_id(&mut Cuid2Ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stutter {
        tokens: Vec<&'static str>,
    }

    impl IdSource for Stutter {
        fn next_token(&mut self) -> String {
            self.tokens.remove(0).to_string()
        }
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new("g");
        assert_eq!(random_id(&mut ids), "g1");
        assert_eq!(random_id(&mut ids), "g2");
    }

    #[test]
    fn empty_tokens_are_retried() {
        let mut source = Stutter {
            tokens: vec!["", "", "abc"],
        };
        assert_eq!(random_id(&mut source), "abc");
        assert!(source.tokens.is_empty());
    }

    #[test]
    fn cuid2_ids_are_non_empty_and_distinct() {
        let a = random();
        let b = random();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn node_id_serializes_as_plain_string() {
        let id = NodeId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
        let back: NodeId = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(back, id);
    }
}
