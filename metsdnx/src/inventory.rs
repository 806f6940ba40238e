//! File section assembly.
//!
//! One `mets:fileGrp` per representation, one `mets:file` per walked file.
//! Every identifier minted here goes through the document's [`IdRegistry`],
//! so a clash anywhere in the file section fails the build.

use crate::error::BuildResult;
use crate::ids::{amd_id, file_id, representation_id, AmdScope, IdRegistry};
use crate::mets;
use crate::walk::WalkedTree;
use crate::xml::Element;

/// Build the file group for representation `rep`.
pub fn file_group(rep: u32, tree: &WalkedTree, registry: &mut IdRegistry) -> BuildResult<Element> {
    let group_id = registry.register(representation_id(rep))?;
    let mut group = mets::file_grp(&group_id, &amd_id(AmdScope::Representation(rep)));

    for entry in tree.files() {
        let id = registry.register(file_id(entry.ordinal, rep))?;
        let admid = amd_id(AmdScope::File {
            file: entry.ordinal,
            rep,
        });
        group.push(mets::file(&id, &admid).with_child(mets::flocat(&entry.location)));
    }
    Ok(group)
}

/// Wrap finished file groups in a `mets:fileSec`.
pub fn file_sec(groups: Vec<Element>) -> Element {
    mets::file_sec().with_children(groups)
}
