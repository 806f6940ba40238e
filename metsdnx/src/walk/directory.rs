//! Walk a representation directory on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{path_string, TreeNode, WalkedTree};
use crate::error::{BuildError, BuildResult};
use crate::fixity::{calculate_checksum, FileStat, FixityAlgorithm};
use crate::representation::{display_label, FileEntry, Fixity};

/// Directories file locations are made relative to, both absolute.
struct LocationRoots {
    /// Declared input root.
    root: PathBuf,
    /// Parent of the walked directory, used for files outside `root`.
    fallback: PathBuf,
}

impl LocationRoots {
    fn location(&self, path: &Path, name: &str) -> String {
        relative_to(path, &self.root)
            .or_else(|| relative_to(path, &self.fallback))
            .unwrap_or_else(|| name.to_string())
    }
}

/// Walk `dir` recursively.
///
/// Locations are relative to `input_dir`, or to the parent of `dir` when no
/// input root is given (so files of `batch/pm` are located as `pm/...`).
/// Both paths are resolved to absolute form first, so `pm` and `./batch/pm`
/// locate files the same way. Entries are visited in directory-listing order.
pub fn walk_directory(
    dir: &Path,
    input_dir: Option<&Path>,
    algorithm: FixityAlgorithm,
) -> BuildResult<WalkedTree> {
    let dir = absolute(dir)?;
    let fallback = dir.parent().unwrap_or(&dir).to_path_buf();
    let root = match input_dir {
        Some(root) => absolute(root)?,
        None => fallback.clone(),
    };
    let roots = LocationRoots { root, fallback };
    let nodes = walk_level(&dir, &roots, algorithm)?;
    Ok(WalkedTree::new(nodes))
}

/// Walk a single file as a one-entry tree, located by its file name.
pub fn walk_file(path: &Path, algorithm: FixityAlgorithm) -> BuildResult<WalkedTree> {
    if !path.is_file() {
        return Err(BuildError::read_failed(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a regular file"),
        ));
    }
    let path = absolute(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| BuildError::MissingInput(format!("no file name in {}", path.display())))?;
    let parent = path.parent().unwrap_or(&path).to_path_buf();
    let roots = LocationRoots {
        root: parent.clone(),
        fallback: parent,
    };
    let entry = file_entry(&path, name, &roots, algorithm)?;
    Ok(WalkedTree::new(vec![TreeNode::File(entry)]))
}

fn absolute(path: &Path) -> BuildResult<PathBuf> {
    fs::canonicalize(path).map_err(|e| BuildError::read_failed(path, e))
}

/// `path` below `base` as a forward-slash string; `None` when outside it.
fn relative_to(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base)
        .ok()
        .filter(|rest| !rest.as_os_str().is_empty())
        .map(path_string)
}

fn walk_level(
    dir: &Path,
    roots: &LocationRoots,
    algorithm: FixityAlgorithm,
) -> BuildResult<Vec<TreeNode>> {
    let entries = fs::read_dir(dir).map_err(|e| BuildError::read_failed(dir, e))?;

    let mut nodes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::read_failed(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            let children = walk_level(&path, roots, algorithm)?;
            nodes.push(TreeNode::Directory { name, children });
        } else {
            nodes.push(TreeNode::File(file_entry(&path, name, roots, algorithm)?));
        }
    }
    Ok(nodes)
}

fn file_entry(
    path: &Path,
    name: String,
    roots: &LocationRoots,
    algorithm: FixityAlgorithm,
) -> BuildResult<FileEntry> {
    let stat = FileStat::from_path(path)?;
    let checksum = calculate_checksum(path, algorithm)?;
    let original_path = path_string(path);
    let location = roots.location(path, &name);

    debug!(
        path = %original_path,
        size = stat.size_bytes,
        checksum = %checksum,
        "walked file"
    );

    Ok(FileEntry {
        ordinal: 0,
        label: display_label(&name, None),
        original_name: name,
        original_path,
        location,
        size_bytes: Some(stat.size_bytes),
        created: Some(stat.created),
        modified: Some(stat.modified),
        fixity: Some(Fixity {
            algorithm,
            value: checksum,
        }),
        note: None,
        events: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_walk_nested_directory() {
        let temp = TempDir::new().unwrap();
        let pm = temp.path().join("pm");
        fs::create_dir_all(pm.join("sub")).unwrap();
        fs::write(pm.join("sub").join("page.tif"), b"page").unwrap();

        let tree = walk_directory(&pm, Some(temp.path()), FixityAlgorithm::Md5).unwrap();

        assert_eq!(tree.nodes().len(), 1);
        match &tree.nodes()[0] {
            TreeNode::Directory { name, children } => {
                assert_eq!(name, "sub");
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected directory, got {:?}", other),
        }

        let files = tree.files();
        assert_eq!(files.len(), 1);
        let file = files[0];
        assert_eq!(file.ordinal, 1);
        assert_eq!(file.location, "pm/sub/page.tif");
        assert_eq!(file.label, "page");
        assert_eq!(file.size_bytes, Some(4));
        assert!(file.original_path.ends_with("pm/sub/page.tif"));
        let fixity = file.fixity.as_ref().unwrap();
        assert_eq!(fixity.algorithm, FixityAlgorithm::Md5);
        assert_eq!(fixity.value.len(), 32);
    }

    #[test]
    fn test_location_defaults_to_parent_of_directory() {
        let temp = TempDir::new().unwrap();
        let ad = temp.path().join("ad");
        fs::create_dir_all(&ad).unwrap();
        fs::write(ad.join("access.jpg"), b"jpg").unwrap();

        let tree = walk_directory(&ad, None, FixityAlgorithm::Md5).unwrap();
        assert_eq!(tree.files()[0].location, "ad/access.jpg");
    }

    #[test]
    fn test_ordinals_cover_every_file() {
        let temp = TempDir::new().unwrap();
        let pm = temp.path().join("pm");
        fs::create_dir_all(&pm).unwrap();
        for name in ["a.tif", "b.tif", "c.tif"] {
            fs::write(pm.join(name), name.as_bytes()).unwrap();
        }

        let tree = walk_directory(&pm, Some(temp.path()), FixityAlgorithm::Sha256).unwrap();
        let mut ordinals: Vec<_> = tree.files().iter().map(|f| f.ordinal).collect();
        ordinals.sort();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    /// Same-named files in sibling directories, in a scratch directory under
    /// the working directory so the walk can be given relative paths.
    fn relative_fixture() -> (TempDir, PathBuf) {
        let temp = TempDir::new_in(".").unwrap();
        let pm = temp.path().join("pm");
        for sub in ["a", "b"] {
            fs::create_dir_all(pm.join(sub)).unwrap();
            fs::write(pm.join(sub).join("page.tif"), sub.as_bytes()).unwrap();
        }
        let relative = PathBuf::from(temp.path().file_name().unwrap());
        (temp, relative)
    }

    fn sorted_locations(tree: &WalkedTree) -> Vec<String> {
        let mut locations: Vec<_> = tree.files().iter().map(|f| f.location.clone()).collect();
        locations.sort();
        locations
    }

    #[test]
    fn test_relative_directory_keeps_subdirectories() {
        let (_temp, relative) = relative_fixture();

        let tree = walk_directory(&relative.join("pm"), None, FixityAlgorithm::Md5).unwrap();
        assert_eq!(
            sorted_locations(&tree),
            vec!["pm/a/page.tif", "pm/b/page.tif"]
        );
    }

    #[test]
    fn test_relative_directory_with_relative_input_dir() {
        let (_temp, relative) = relative_fixture();

        let pm = relative.join("pm");
        let tree = walk_directory(&pm, Some(relative.as_path()), FixityAlgorithm::Md5).unwrap();
        assert_eq!(
            sorted_locations(&tree),
            vec!["pm/a/page.tif", "pm/b/page.tif"]
        );

        let tree = walk_directory(&pm, Some(Path::new(".")), FixityAlgorithm::Md5).unwrap();
        let prefix = format!("{}/pm/", relative.display());
        let locations = sorted_locations(&tree);
        assert_eq!(
            locations,
            vec![format!("{}a/page.tif", prefix), format!("{}b/page.tif", prefix)]
        );
    }

    #[test]
    fn test_input_dir_spelled_differently() {
        let (temp, relative) = relative_fixture();

        let tree = walk_directory(
            &relative.join("pm"),
            Some(temp.path().join("pm").join("..").as_path()),
            FixityAlgorithm::Md5,
        )
        .unwrap();
        assert_eq!(
            sorted_locations(&tree),
            vec!["pm/a/page.tif", "pm/b/page.tif"]
        );
    }

    #[test]
    fn test_files_outside_input_dir_use_parent_of_directory() {
        let (_temp, relative) = relative_fixture();
        let elsewhere = TempDir::new().unwrap();

        let tree =
            walk_directory(&relative.join("pm"), Some(elsewhere.path()), FixityAlgorithm::Md5)
                .unwrap();
        assert_eq!(
            sorted_locations(&tree),
            vec!["pm/a/page.tif", "pm/b/page.tif"]
        );
    }

    #[test]
    fn test_walk_single_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.final.pdf");
        fs::write(&path, b"%PDF").unwrap();

        let tree = walk_file(&path, FixityAlgorithm::Md5).unwrap();
        let files = tree.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].ordinal, 1);
        assert_eq!(files[0].location, "report.final.pdf");
        assert_eq!(files[0].label, "report.final");
    }

    #[test]
    fn test_walk_file_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let result = walk_file(temp.path(), FixityAlgorithm::Md5);
        assert!(matches!(result, Err(BuildError::ReadFailed { .. })));
    }

    #[test]
    fn test_missing_directory() {
        let result = walk_directory(Path::new("/nonexistent/pm"), None, FixityAlgorithm::Md5);
        assert!(matches!(result, Err(BuildError::ReadFailed { .. })));
    }
}
