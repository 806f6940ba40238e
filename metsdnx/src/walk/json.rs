//! Walk a JSON description of a representation.
//!
//! Node shapes:
//!
//! ```text
//! {"type": "directory", "name": "sub", "children": [ ... ]}
//! {"type": "file", "name": "img.jpg", "fileOriginalPath": "...", "MD5": "...",
//!  "fileSizeBytes": "123", "fileCreationDate": "...", "fileModificationDate": "...",
//!  "label": "...", "note": "...", "events": [{...}]}
//! ```
//!
//! `name` is the canonical file name field for both node types;
//! `fileOriginalName` is read as a fallback on file nodes. Nodes with a
//! missing or unknown `type`, or without a name, are skipped with a warning.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{strip_root, to_forward_slashes, TreeNode, WalkedTree};
use crate::dnx::{DnxRecord, EVENT};
use crate::error::{BuildError, BuildResult};
use crate::fixity::{calculate_checksum, verify_checksum, FileStat, FixityAlgorithm};
use crate::representation::{display_label, FileEntry, Fixity};

/// Settings for a JSON walk.
#[derive(Debug, Clone, Default)]
pub struct JsonWalkOptions {
    /// Root that file locations are made relative to, and against which
    /// relative paths are resolved.
    pub input_dir: Option<PathBuf>,

    /// Algorithm used when a resolvable file carries no checksum.
    pub algorithm: FixityAlgorithm,
}

impl JsonWalkOptions {
    pub fn new(input_dir: Option<PathBuf>) -> Self {
        Self {
            input_dir,
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: FixityAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Walk a JSON node list, given parsed or as JSON text.
pub fn walk_json(nodes: &Value, options: &JsonWalkOptions) -> BuildResult<WalkedTree> {
    let parsed;
    let items = match nodes {
        Value::Array(items) => items,
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)?;
            parsed.as_array().ok_or_else(|| {
                BuildError::InvalidJson("representation tree must be a list of nodes".into())
            })?
        }
        other => {
            return Err(BuildError::InvalidJson(format!(
                "representation tree must be a list of nodes, got {}",
                other
            )))
        }
    };

    let nodes = walk_nodes(items, &[], options)?;
    Ok(WalkedTree::new(nodes))
}

fn walk_nodes(
    items: &[Value],
    parents: &[String],
    options: &JsonWalkOptions,
) -> BuildResult<Vec<TreeNode>> {
    let mut nodes = Vec::new();

    for item in items {
        let Some(object) = item.as_object() else {
            warn!(node = %item, "skipping JSON node that is not an object");
            continue;
        };
        let Some(node_type) = object.get("type").and_then(Value::as_str) else {
            warn!(node = %item, "skipping JSON node without a 'type' value");
            continue;
        };

        match node_type {
            "file" => {
                let Some(name) = string_field(object, "name")
                    .or_else(|| string_field(object, "fileOriginalName"))
                else {
                    warn!(node = %item, "skipping file node without a name");
                    continue;
                };
                let entry = file_entry(object, name, parents, options)?;
                nodes.push(TreeNode::File(entry));
            }
            "directory" => {
                let Some(name) = string_field(object, "name") else {
                    warn!(node = %item, "skipping directory node without a name");
                    continue;
                };
                let children: &[Value] = match object.get("children") {
                    Some(Value::Array(children)) => children.as_slice(),
                    None | Some(Value::Null) => &[],
                    Some(other) => {
                        warn!(directory = %name, children = %other, "ignoring non-list children");
                        &[]
                    }
                };
                let mut path = parents.to_vec();
                path.push(name.clone());
                let children = walk_nodes(children, &path, options)?;
                nodes.push(TreeNode::Directory { name, children });
            }
            other => {
                warn!(node_type = other, node = %item, "skipping JSON node with invalid type");
            }
        }
    }
    Ok(nodes)
}

fn file_entry(
    object: &Map<String, Value>,
    name: String,
    parents: &[String],
    options: &JsonWalkOptions,
) -> BuildResult<FileEntry> {
    let json_path = parents
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(name.as_str()))
        .collect::<Vec<_>>()
        .join("/");
    let supplied_path = string_field(object, "fileOriginalPath").map(|p| to_forward_slashes(&p));
    let original_path = supplied_path.clone().unwrap_or_else(|| json_path.clone());

    let resolved = resolve(&original_path, &json_path, options.input_dir.as_deref());

    let fixity = match (supplied_fixity(object), resolved.as_deref()) {
        (Some(fixity), Some(path)) => {
            verify_checksum(path, fixity.algorithm, &fixity.value)?;
            Some(fixity)
        }
        (Some(fixity), None) => {
            debug!(path = %original_path, "checksum supplied but file not resolvable, not verifying");
            Some(fixity)
        }
        (None, Some(path)) => Some(Fixity {
            algorithm: options.algorithm,
            value: calculate_checksum(path, options.algorithm)?,
        }),
        (None, None) => None,
    };

    let stat = resolved.as_deref().map(FileStat::from_path).transpose()?;

    let root = options
        .input_dir
        .as_deref()
        .map(|p| to_forward_slashes(&p.to_string_lossy()))
        .unwrap_or_default();
    let location = strip_root(&original_path, &root)
        .or_else(|| supplied_path.filter(|p| !is_absolute(p)))
        .unwrap_or(json_path);

    Ok(FileEntry {
        ordinal: 0,
        label: display_label(&name, string_field(object, "label").as_deref()),
        original_path,
        location,
        size_bytes: size_field(object).or_else(|| stat.as_ref().map(|s| s.size_bytes)),
        created: string_field(object, "fileCreationDate")
            .or_else(|| stat.as_ref().map(|s| s.created.clone())),
        modified: string_field(object, "fileModificationDate")
            .or_else(|| stat.as_ref().map(|s| s.modified.clone())),
        fixity,
        note: string_field(object, "note"),
        events: events(object),
        original_name: name,
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn size_field(object: &Map<String, Value>) -> Option<u64> {
    match object.get("fileSizeBytes")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Checksum supplied under a key matching an algorithm tag, any case.
fn supplied_fixity(object: &Map<String, Value>) -> Option<Fixity> {
    FixityAlgorithm::ALL.iter().find_map(|algorithm| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(algorithm.tag()))
            .and_then(|(_, value)| value.as_str())
            .filter(|value| !value.trim().is_empty())
            .map(|value| Fixity {
                algorithm: *algorithm,
                value: value.to_string(),
            })
    })
}

fn events(object: &Map<String, Value>) -> Vec<DnxRecord> {
    let Some(Value::Array(items)) = object.get("events") else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item.as_object() {
            Some(event) => Some(DnxRecord::from_json_object(EVENT, event)),
            None => {
                warn!(event = %item, "skipping event that is not an object");
                None
            }
        })
        .collect()
}

/// Find the file on disk, if it exists.
fn resolve(original_path: &str, json_path: &str, input_dir: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(original_path)];
    if let Some(root) = input_dir {
        if !is_absolute(original_path) {
            candidates.push(root.join(original_path));
        }
        candidates.push(root.join(json_path));
    }
    candidates.into_iter().find(|p| p.is_file())
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || Path::new(path).is_absolute()
}
