//! File-tree walking.
//!
//! Both walkers return a [`WalkedTree`]: an owned tree of directories and
//! file entries in the order the source listed them. Nothing is sorted. Files
//! are numbered 1, 2, 3... depth-first once the tree is complete, and that
//! numbering drives both the file section and the structural maps.

pub mod directory;
pub mod json;

use std::path::Path;

use crate::representation::FileEntry;

pub use directory::{walk_directory, walk_file};
pub use json::{walk_json, JsonWalkOptions};

/// A node of a walked representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory {
        name: String,
        children: Vec<TreeNode>,
    },
    File(FileEntry),
}

/// The walked contents of one representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkedTree {
    nodes: Vec<TreeNode>,
}

impl WalkedTree {
    /// Take ownership of walked nodes and number their files.
    pub fn new(mut nodes: Vec<TreeNode>) -> Self {
        let mut next = 1;
        number_files(&mut nodes, &mut next);
        Self { nodes }
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// All file entries, in ordinal order.
    pub fn files(&self) -> Vec<&FileEntry> {
        let mut out = Vec::new();
        collect_files(&self.nodes, &mut out);
        out
    }

    pub fn file_count(&self) -> usize {
        self.files().len()
    }
}

fn number_files(nodes: &mut [TreeNode], next: &mut u32) {
    for node in nodes {
        match node {
            TreeNode::File(entry) => {
                entry.ordinal = *next;
                *next += 1;
            }
            TreeNode::Directory { children, .. } => number_files(children, next),
        }
    }
}

fn collect_files<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a FileEntry>) {
    for node in nodes {
        match node {
            TreeNode::File(entry) => out.push(entry),
            TreeNode::Directory { children, .. } => collect_files(children, out),
        }
    }
}

/// Rewrite backslash separators to forward slashes.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Path as a forward-slash string.
pub(crate) fn path_string(path: &Path) -> String {
    to_forward_slashes(&path.to_string_lossy())
}

/// Strip `root` from the front of `path` (both forward-slash strings).
pub(crate) fn strip_root(path: &str, root: &str) -> Option<String> {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return None;
    }
    path.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

/// Bare file entry for unit tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn test_entry(name: &str) -> FileEntry {
    FileEntry {
        ordinal: 0,
        original_name: name.to_string(),
        original_path: name.to_string(),
        location: name.to_string(),
        label: crate::representation::display_label(name, None),
        size_bytes: None,
        created: None,
        modified: None,
        fixity: None,
        note: None,
        events: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_numbered_depth_first() {
        let tree = WalkedTree::new(vec![
            TreeNode::File(test_entry("a")),
            TreeNode::Directory {
                name: "sub".into(),
                children: vec![TreeNode::File(test_entry("b")), TreeNode::File(test_entry("c"))],
            },
            TreeNode::File(test_entry("d")),
        ]);
        let numbered: Vec<_> = tree
            .files()
            .iter()
            .map(|f| (f.original_name.as_str(), f.ordinal))
            .collect();
        assert_eq!(numbered, vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        assert_eq!(tree.file_count(), 4);
    }

    #[test]
    fn test_forward_slashes() {
        assert_eq!(to_forward_slashes(r"pm\sub\img.jpg"), "pm/sub/img.jpg");
        assert_eq!(to_forward_slashes("pm/img.jpg"), "pm/img.jpg");
    }

    #[test]
    fn test_strip_root() {
        assert_eq!(
            strip_root("/data/batch/pm/img.jpg", "/data/batch/"),
            Some("pm/img.jpg".to_string())
        );
        assert_eq!(strip_root("/data/batchx/img.jpg", "/data/batch"), None);
        assert_eq!(strip_root("/data/batch", "/data/batch"), None);
        assert_eq!(strip_root("img.jpg", ""), None);
    }
}
