//! Centralized identifier conventions.
//!
//! This module is the single source of truth for every `ID` in a document:
//! - IE sections (`ie-dmd`, `ie-amd`)
//! - Representation file groups (`rep2`) and blocks (`rep2-amd`)
//! - File entries (`fid3-2`, file 3 of representation 2) and blocks (`fid3-2-amd`)
//! - Structural maps (`rep2-1`)
//!
//! Identifiers depend on position only. Builders mint them here in their final
//! form and record them in an [`IdRegistry`]; [`normalize`] exists for trees
//! that still carry the internal `ie1-rep2-file3` spelling.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{BuildError, BuildResult};
use crate::representation::{StructMapKind, StructMapType};
use crate::xml::Element;

/// Suffix shared by every administrative-metadata block identifier.
pub const AMD_SUFFIX: &str = "-amd";

/// Identifier of the IE descriptive metadata section.
pub const IE_DMD_ID: &str = "ie-dmd";

/// Identifier of the IE administrative metadata block.
pub const IE_AMD_ID: &str = "ie-amd";

/// Attributes that carry identifiers or references to them.
pub const ID_ATTRIBUTES: [&str; 3] = ["ID", "ADMID", "FILEID"];

/// Scope an administrative-metadata block is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmdScope {
    Ie,
    Representation(u32),
    File { file: u32, rep: u32 },
}

/// File group identifier for a representation.
///
/// # Examples
///
/// ```
/// use metsdnx::ids::representation_id;
///
/// assert_eq!(representation_id(2), "rep2");
/// ```
pub fn representation_id(rep: u32) -> String {
    format!("rep{}", rep)
}

/// File entry identifier: file ordinal first, representation ordinal second.
///
/// # Examples
///
/// ```
/// use metsdnx::ids::file_id;
///
/// assert_eq!(file_id(3, 2), "fid3-2");
/// ```
pub fn file_id(file: u32, rep: u32) -> String {
    format!("fid{}-{}", file, rep)
}

/// Administrative-metadata block identifier for a scope.
///
/// # Examples
///
/// ```
/// use metsdnx::ids::{amd_id, AmdScope};
///
/// assert_eq!(amd_id(AmdScope::Ie), "ie-amd");
/// assert_eq!(amd_id(AmdScope::Representation(1)), "rep1-amd");
/// assert_eq!(amd_id(AmdScope::File { file: 3, rep: 2 }), "fid3-2-amd");
/// ```
pub fn amd_id(scope: AmdScope) -> String {
    match scope {
        AmdScope::Ie => IE_AMD_ID.to_string(),
        AmdScope::Representation(rep) => format!("{}{}", representation_id(rep), AMD_SUFFIX),
        AmdScope::File { file, rep } => format!("{}{}", file_id(file, rep), AMD_SUFFIX),
    }
}

/// Structural map identifier for a representation.
///
/// Every representation's first map is `rep{n}-1`. When both kinds are
/// built, the logical map keeps that identifier and the physical map gets a
/// `-physical` suffix.
pub fn struct_map_id(rep: u32, kind: StructMapKind, mode: StructMapType) -> String {
    let base = format!("{}-1", representation_id(rep));
    match (mode, kind) {
        (StructMapType::Both, StructMapKind::Physical) => format!("{}-physical", base),
        _ => base,
    }
}

fn ie_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ie{i}- in front of any identifier
    PATTERN.get_or_init(|| Regex::new(r"^ie\d+-").unwrap())
}

fn rep_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // rep{n}-file{f} -> fid{f}-{n}
    PATTERN.get_or_init(|| Regex::new(r"^rep(\d+)-file(\d+)").unwrap())
}

/// Rewrite one identifier token into its external form.
///
/// Drops `ie{i}-` prefixes and reorders `rep{n}-file{f}` into
/// `fid{f}-{n}`; any suffix (`-amd`, `-tech`) is kept. External identifiers
/// come back unchanged.
///
/// # Examples
///
/// ```
/// use metsdnx::ids::normalize_id;
///
/// assert_eq!(normalize_id("ie1-rep2-file3"), "fid3-2");
/// assert_eq!(normalize_id("ie1-rep2-file3-amd"), "fid3-2-amd");
/// assert_eq!(normalize_id("ie1-rep2-amd"), "rep2-amd");
/// assert_eq!(normalize_id("fid3-2"), "fid3-2");
/// ```
pub fn normalize_id(id: &str) -> String {
    let stripped = ie_prefix_pattern().replace(id, "");
    rep_file_pattern()
        .replace(&stripped, "fid${2}-${1}")
        .into_owned()
}

/// Normalize a reference attribute value, which may list several identifiers.
fn normalize_value(value: &str) -> String {
    value
        .split_whitespace()
        .map(normalize_id)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrite every `ID`, `ADMID` and `FILEID` attribute in the tree.
///
/// Idempotent: running it over already-normalized output changes nothing.
pub fn normalize(root: &mut Element) {
    root.visit_mut(&mut |element| {
        for (name, value) in element.attributes_mut() {
            if ID_ATTRIBUTES.contains(&name) {
                let normalized = normalize_value(value);
                if normalized != *value {
                    *value = normalized;
                }
            }
        }
    });
}

/// Records identifiers as they are minted.
#[derive(Debug, Default)]
pub struct IdRegistry {
    ids: HashSet<String>,
    order: Vec<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier, rejecting duplicates.
    pub fn register(&mut self, id: impl Into<String>) -> BuildResult<String> {
        let id = id.into();
        if !self.ids.insert(id.clone()) {
            return Err(BuildError::DuplicateIdentifier(id));
        }
        self.order.push(id.clone());
        Ok(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Check that every `ADMID` and `FILEID` in the tree names an existing `ID`.
pub fn check_references(root: &Element) -> BuildResult<()> {
    let elements = root.descendants();
    let ids: HashSet<&str> = elements.iter().filter_map(|e| e.attr("ID")).collect();

    for element in &elements {
        for attribute in ["ADMID", "FILEID"] {
            let Some(value) = element.attr(attribute) else {
                continue;
            };
            for reference in value.split_whitespace() {
                if !ids.contains(reference) {
                    return Err(BuildError::DanglingReference {
                        attribute: attribute.to_string(),
                        value: reference.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
