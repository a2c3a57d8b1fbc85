mod config;

use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use ruletree::{
    Edited, Editor, Group, GroupField, IdSource, ItemField, NewNode, Node, NodeId,
    ValidateError, find_node, validate,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

pub use crate::config::{Config, ConfigError};

pub type Tree = Group<Value>;

#[derive(Parser, Debug)]
#[command(name = "ruletree", version, about = "Edit condition trees stored as JSON")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Tree JSON file. Read from stdin when absent.
    #[arg(long = "tree", global = true)]
    pub tree_path: Option<PathBuf>,

    #[arg(long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    #[arg(long = "log", global = true, default_value = "info")]
    pub log: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a new, empty root group
    New {
        #[arg(long)]
        relation: Option<String>,
    },
    /// Append an item, or a group with --group, to a group
    Add {
        #[arg(long)]
        target: String,

        #[arg(long)]
        group: bool,

        /// Relation for the new group
        #[arg(long, requires = "group")]
        relation: Option<String>,
    },
    /// Remove a node and its subtree
    Remove {
        #[arg(long)]
        target: String,
    },
    /// Move a node after a sibling, or to the front of a group with --as-child
    Move {
        #[arg(long)]
        from: String,

        #[arg(long)]
        target: String,

        #[arg(long)]
        as_child: bool,
    },
    /// Set the relation of a group
    Relation {
        #[arg(long)]
        target: String,

        #[arg(long)]
        value: String,
    },
    /// Set or clear the data of an item
    Data {
        #[arg(long)]
        target: String,

        /// Payload as a JSON string. Clears the data when absent.
        #[arg(long = "json")]
        data_json: Option<String>,
    },
    /// Print a node and the id of its parent
    Find {
        #[arg(long)]
        target: String,
    },
    /// Validate the tree and print its size
    Check,
}

impl Command {
    fn reads_tree(&self) -> bool {
        !matches!(self, Command::New { .. })
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read tree from {from}: {source}")]
    ReadTree {
        from: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse tree: {0}")]
    ParseTree(#[source] serde_json::Error),

    #[error("tree root must be a group")]
    RootNotGroup,

    #[error("invalid tree: {0}")]
    Invalid(#[from] ValidateError),

    #[error("no tree to edit")]
    MissingTree,

    #[error("node {0} not found")]
    NotFound(NodeId),

    #[error("failed to parse --json payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[source] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Tree(Node<Value>),
    Found {
        node: Node<Value>,
        parent: Option<NodeId>,
    },
    Check {
        nodes: usize,
    },
}

pub fn run(cli: Cli) -> Result<(), AppError> {
    let Cli {
        command,
        tree_path,
        config_path,
        log: _,
    } = cli;

    let config = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let mut editor = Editor::new().with_config(config.editor);

    let tree = if command.reads_tree() {
        Some(read_tree(tree_path.as_deref())?)
    } else {
        None
    };

    let output = execute(&mut editor, command, tree)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).map_err(AppError::Write)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn execute<S>(
    editor: &mut Editor<S>,
    command: Command,
    tree: Option<Tree>,
) -> Result<Output, AppError>
where
    S: IdSource,
{
    let edited = match (command, tree) {
        (Command::New { relation }, _) => return Ok(create(editor, relation)),
        (_, None) => return Err(AppError::MissingTree),
        (
            Command::Add {
                target,
                group,
                relation,
            },
            Some(tree),
        ) => {
            let new_node = match (group, relation) {
                (true, Some(relation)) => NewNode::group(relation),
                (true, None) => editor.default_group(),
                (false, _) => NewNode::Item,
            };
            editor.add_node(&tree, &target.into(), new_node)
        }
        (Command::Remove { target }, Some(tree)) => editor.remove_node(&tree, &target.into()),
        (
            Command::Move {
                from,
                target,
                as_child,
            },
            Some(tree),
        ) => editor.move_node(&tree, &from.into(), &target.into(), as_child),
        (Command::Relation { target, value }, Some(tree)) => {
            editor.edit_group(&tree, &target.into(), GroupField::Relation(value))
        }
        (Command::Data { target, data_json }, Some(tree)) => {
            let data = data_json
                .map(|json| serde_json::from_str(&json))
                .transpose()
                .map_err(AppError::Payload)?;
            editor.edit_item(&tree, &target.into(), ItemField::Data(data))
        }
        (Command::Find { target }, Some(tree)) => {
            let target = NodeId::from(target);
            let found = find_node(&tree, &target).ok_or(AppError::NotFound(target))?;
            return Ok(Output::Found {
                node: found.node.to_node(),
                parent: found.parent.map(|parent| parent.id.clone()),
            });
        }
        (Command::Check, Some(tree)) => {
            return Ok(Output::Check {
                nodes: tree.node_count(),
            });
        }
    };
    Ok(report(edited))
}

fn create<S: IdSource>(editor: &mut Editor<S>, relation: Option<String>) -> Output {
    let mut root = editor.new_root();
    if let Some(relation) = relation {
        root.relation = relation;
    }
    info!(id = %root.id, "Created tree");
    Output::Tree(Node::Group(root))
}

fn report(edited: Edited<Value>) -> Output {
    let Edited { tree, outcome } = edited;
    info!(%outcome, nodes = tree.node_count(), "Edited tree");
    Output::Tree(Node::Group(tree))
}

fn read_tree(path: Option<&Path>) -> Result<Tree, AppError> {
    let (from, reader): (String, Box<dyn Read>) = match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| AppError::ReadTree {
                from: path.display().to_string(),
                source,
            })?;
            (path.display().to_string(), Box::new(BufReader::new(file)))
        }
        None => ("stdin".to_string(), Box::new(io::stdin().lock())),
    };
    tracing::debug!("Reading tree from {from}");
    parse_tree(reader)
}

pub fn parse_tree<R: Read>(reader: R) -> Result<Tree, AppError> {
    let node: Node<Value> = serde_json::from_reader(reader).map_err(AppError::ParseTree)?;
    let tree = node.into_group().ok_or(AppError::RootNotGroup)?;
    validate(&tree)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use ruletree::SequentialIds;
    use serde_json::json;

    use super::*;

    const TREE: &str = r#"{
        "type": "group",
        "id": "g",
        "relation": "and",
        "children": [
            { "type": "item", "id": "a", "data": { "field": "age" } },
            { "type": "group", "id": "h", "relation": "or", "children": [] }
        ]
    }"#;

    fn editor() -> Editor<SequentialIds> {
        Editor::with_ids(SequentialIds::new("new"))
    }

    fn tree() -> Tree {
        parse_tree(TREE.as_bytes()).unwrap()
    }

    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["ruletree"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    fn run_json(args: &[&str]) -> Value {
        let output = execute(&mut editor(), command(args), Some(tree())).unwrap();
        serde_json::to_value(output).unwrap()
    }

    #[test]
    fn new_prints_empty_root() {
        let output = execute(&mut editor(), command(&["new", "--relation", "or"]), None).unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({ "type": "group", "id": "new1", "relation": "or", "children": [] })
        );
    }

    #[test]
    fn add_group_with_default_relation() {
        let value = run_json(&["add", "--target", "h", "--group"]);
        assert_eq!(
            value["children"][1]["children"][0],
            json!({ "type": "group", "id": "new1", "relation": "and", "children": [] })
        );
    }

    #[test]
    fn add_item() {
        let value = run_json(&["add", "--target", "g"]);
        assert_eq!(value["children"][2], json!({ "type": "item", "id": "new1" }));
    }

    #[test]
    fn move_as_child() {
        let value = run_json(&["move", "--from", "a", "--target", "h", "--as-child"]);
        assert_eq!(value["children"].as_array().unwrap().len(), 1);
        assert_eq!(value["children"][0]["children"][0]["id"], "a");
    }

    #[test]
    fn data_sets_and_clears_payload() {
        let value = run_json(&["data", "--target", "a", "--json", r#"{"field":"name"}"#]);
        assert_eq!(value["children"][0]["data"], json!({ "field": "name" }));

        let value = run_json(&["data", "--target", "a"]);
        assert_eq!(value["children"][0], json!({ "type": "item", "id": "a" }));
    }

    #[test]
    fn bad_payload_is_an_error() {
        let err = execute(
            &mut editor(),
            command(&["data", "--target", "a", "--json", "{"]),
            Some(tree()),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Payload(_)));
    }

    #[test]
    fn relation_and_remove() {
        let value = run_json(&["relation", "--target", "h", "--value", "xor"]);
        assert_eq!(value["children"][1]["relation"], "xor");

        let value = run_json(&["remove", "--target", "h"]);
        assert_eq!(value["children"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn find_reports_parent() {
        let value = run_json(&["find", "--target", "h"]);
        assert_eq!(value["parent"], "g");
        assert_eq!(value["node"]["relation"], "or");

        let value = run_json(&["find", "--target", "g"]);
        assert_eq!(value["parent"], Value::Null);

        let err = execute(&mut editor(), command(&["find", "--target", "zz"]), Some(tree()))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn check_counts_nodes() {
        assert_eq!(run_json(&["check"]), json!({ "nodes": 3 }));
    }

    #[test]
    fn parse_tree_requires_group_root() {
        let err = parse_tree(r#"{ "type": "item", "id": "a" }"#.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::RootNotGroup));
    }

    #[test]
    fn parse_tree_rejects_duplicate_ids() {
        let j = r#"{ "type": "group", "id": "g", "relation": "and", "children": [
            { "type": "item", "id": "g" }
        ] }"#;
        let err = parse_tree(j.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Invalid(ValidateError::DuplicateId(_))));
    }

    #[test]
    fn relation_requires_group_flag() {
        let result = Cli::try_parse_from(["ruletree", "add", "--target", "g", "--relation", "or"]);
        assert!(result.is_err());
    }
}
