//! Condition trees for rule builders: groups of items and nested groups,
//! searched by id and edited copy-on-write.

mod config;
mod edit;
mod id;
mod node;
mod outcome;
mod path;
mod search;
mod validate;

pub use crate::config::*;
pub use crate::edit::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::outcome::*;
pub use crate::search::*;
pub use crate::validate::*;
