//! Structural maps.
//!
//! A logical map is always three levels deep: the representation, a
//! synthetic "Table of Contents" division, then one `FILE` leaf per file in
//! ordinal order. A physical map mirrors the walked directory nesting with
//! one `FOLDER` division per directory.

use crate::ids::file_id;
use crate::mets;
use crate::representation::{FileEntry, RepresentationRole, StructMapKind};
use crate::walk::{TreeNode, WalkedTree};
use crate::xml::Element;

/// Label of the synthetic division in a logical map.
pub const TABLE_OF_CONTENTS: &str = "Table of Contents";

/// Build one structural map of `kind` for representation `rep`.
pub fn build_struct_map(
    id: &str,
    rep: u32,
    role: &RepresentationRole,
    tree: &WalkedTree,
    kind: StructMapKind,
) -> Element {
    let top = mets::div(role.label());
    let top = match kind {
        StructMapKind::Logical => top.with_child(logical_contents(rep, tree)),
        StructMapKind::Physical => top.with_children(physical_divs(rep, tree.nodes())),
    };
    mets::struct_map(id, kind.as_str()).with_child(top)
}

fn logical_contents(rep: u32, tree: &WalkedTree) -> Element {
    mets::div(TABLE_OF_CONTENTS).with_children(tree.files().into_iter().map(|f| file_div(rep, f)))
}

fn physical_divs(rep: u32, nodes: &[TreeNode]) -> Vec<Element> {
    nodes
        .iter()
        .map(|node| match node {
            TreeNode::File(entry) => file_div(rep, entry),
            TreeNode::Directory { name, children } => {
                mets::typed_div("FOLDER", name).with_children(physical_divs(rep, children))
            }
        })
        .collect()
}

fn file_div(rep: u32, entry: &FileEntry) -> Element {
    mets::typed_div("FILE", &entry.label).with_child(mets::fptr(&file_id(entry.ordinal, rep)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walk::test_entry;

    fn nested_tree() -> WalkedTree {
        WalkedTree::new(vec![
            TreeNode::File(test_entry("cover.jpg")),
            TreeNode::Directory {
                name: "chapter1".into(),
                children: vec![
                    TreeNode::File(test_entry("page1.jpg")),
                    TreeNode::Directory {
                        name: "plates".into(),
                        children: vec![TreeNode::File(test_entry("plate.jpg"))],
                    },
                ],
            },
        ])
    }

    fn fptrs(map: &Element) -> Vec<String> {
        map.descendants_named("mets:fptr")
            .iter()
            .filter_map(|f| f.attr("FILEID"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_logical_map_is_flat() {
        let map = build_struct_map(
            "rep1-1",
            1,
            &RepresentationRole::PreservationMaster,
            &nested_tree(),
            StructMapKind::Logical,
        );
        assert_eq!(map.attr("ID"), Some("rep1-1"));
        assert_eq!(map.attr("TYPE"), Some("LOGICAL"));

        let rep = map.find("mets:div").unwrap();
        assert_eq!(rep.attr("LABEL"), Some("Preservation Master"));
        let toc = rep.find("mets:div").unwrap();
        assert_eq!(toc.attr("LABEL"), Some(TABLE_OF_CONTENTS));

        let leaves: Vec<_> = toc.children().collect();
        assert_eq!(leaves.len(), 3);
        assert!(leaves.iter().all(|l| l.attr("TYPE") == Some("FILE")));
        let labels: Vec<_> = leaves.iter().filter_map(|l| l.attr("LABEL")).collect();
        assert_eq!(labels, vec!["cover", "page1", "plate"]);
        assert_eq!(fptrs(&map), vec!["fid1-1", "fid2-1", "fid3-1"]);
    }

    #[test]
    fn test_physical_map_mirrors_nesting() {
        let map = build_struct_map(
            "rep2-1",
            2,
            &RepresentationRole::AccessDerivative,
            &nested_tree(),
            StructMapKind::Physical,
        );
        assert_eq!(map.attr("TYPE"), Some("PHYSICAL"));

        let rep = map.find("mets:div").unwrap();
        assert_eq!(rep.attr("LABEL"), Some("Access Derivative"));
        let children: Vec<_> = rep.children().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attr("TYPE"), Some("FILE"));
        assert_eq!(children[1].attr("TYPE"), Some("FOLDER"));
        assert_eq!(children[1].attr("LABEL"), Some("chapter1"));

        let plates = children[1]
            .children()
            .find(|d| d.attr("LABEL") == Some("plates"))
            .unwrap();
        let leaf = plates.find("mets:div").unwrap();
        assert_eq!(leaf.find("mets:fptr").unwrap().attr("FILEID"), Some("fid3-2"));
        assert_eq!(fptrs(&map), vec!["fid1-2", "fid2-2", "fid3-2"]);
    }

    #[test]
    fn test_explicit_label_kept_verbatim() {
        let mut entry = test_entry("img.jpg");
        entry.label = "Image.One".into();
        let tree = WalkedTree::new(vec![TreeNode::File(entry)]);
        let map = build_struct_map(
            "rep1-1",
            1,
            &RepresentationRole::Other("Thumbnails".into()),
            &tree,
            StructMapKind::Logical,
        );
        let leaf = &map.descendants_named("mets:div")[2];
        assert_eq!(leaf.attr("LABEL"), Some("Image.One"));
        assert_eq!(map.find("mets:div").unwrap().attr("LABEL"), Some("Thumbnails"));
    }

    #[test]
    fn test_empty_representation() {
        let map = build_struct_map(
            "rep1-1",
            1,
            &RepresentationRole::PreservationMaster,
            &WalkedTree::default(),
            StructMapKind::Physical,
        );
        assert!(fptrs(&map).is_empty());
        assert!(map.find("mets:div").unwrap().is_empty());
    }
}
