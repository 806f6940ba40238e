//! Representations, file entries and structural map modes.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::dnx::DnxRecord;
use crate::fixity::FixityAlgorithm;

/// Preservation role of a representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepresentationRole {
    PreservationMaster,
    ModifiedMaster,
    AccessDerivative,
    /// Arbitrary named group (e.g. from a JSON tree); typed as a derivative copy.
    Other(String),
}

impl RepresentationRole {
    /// Label used on the representation-level structural map division.
    pub fn label(&self) -> &str {
        match self {
            RepresentationRole::PreservationMaster => "Preservation Master",
            RepresentationRole::ModifiedMaster => "Modified Master",
            RepresentationRole::AccessDerivative => "Access Derivative",
            RepresentationRole::Other(name) => name,
        }
    }

    /// DNX preservation type for this role.
    pub fn preservation_type(&self) -> PreservationType {
        match self {
            RepresentationRole::PreservationMaster => PreservationType::PreservationMaster,
            RepresentationRole::ModifiedMaster => PreservationType::ModifiedMaster,
            RepresentationRole::AccessDerivative => PreservationType::AccessDerivative,
            RepresentationRole::Other(_) => PreservationType::DerivativeCopy,
        }
    }
}

/// `preservationType` values understood by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservationType {
    PreservationMaster,
    ModifiedMaster,
    AccessDerivative,
    DerivativeCopy,
}

impl PreservationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreservationType::PreservationMaster => "PRESERVATION_MASTER",
            PreservationType::ModifiedMaster => "MODIFIED_MASTER",
            PreservationType::AccessDerivative => "ACCESS_DERIVATIVE",
            PreservationType::DerivativeCopy => "DERIVATIVE_COPY",
        }
    }
}

impl fmt::Display for PreservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which structural maps a document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructMapType {
    Physical,
    #[default]
    Logical,
    Both,
}

impl StructMapType {
    /// Parse a mode string, case-insensitively.
    ///
    /// Anything other than `PHYSICAL`, `LOGICAL` or `BOTH` falls back to
    /// [`StructMapType::Logical`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PHYSICAL" => StructMapType::Physical,
            "BOTH" => StructMapType::Both,
            "LOGICAL" => StructMapType::Logical,
            other => {
                tracing::warn!(mode = other, "unrecognized structmap type, using LOGICAL");
                StructMapType::Logical
            }
        }
    }

    /// Map kinds to build, in emission order.
    pub fn kinds(&self) -> &'static [StructMapKind] {
        match self {
            StructMapType::Physical => &[StructMapKind::Physical],
            StructMapType::Logical => &[StructMapKind::Logical],
            StructMapType::Both => &[StructMapKind::Logical, StructMapKind::Physical],
        }
    }
}

impl fmt::Display for StructMapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructMapType::Physical => f.write_str("PHYSICAL"),
            StructMapType::Logical => f.write_str("LOGICAL"),
            StructMapType::Both => f.write_str("BOTH"),
        }
    }
}

/// A single structural map flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructMapKind {
    /// Mirrors the source directory nesting.
    Physical,
    /// Representation, then "Table of Contents", then one leaf per file.
    Logical,
}

impl StructMapKind {
    /// Value of the structMap `TYPE` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            StructMapKind::Physical => "PHYSICAL",
            StructMapKind::Logical => "LOGICAL",
        }
    }
}

/// Where a representation's files come from.
#[derive(Debug, Clone)]
pub enum RepresentationSource {
    /// A directory enumerated recursively.
    Directory(PathBuf),
    /// A parsed JSON node list.
    Json(serde_json::Value),
}

/// One representation to include in a build.
#[derive(Debug, Clone)]
pub struct RepresentationInput {
    pub role: RepresentationRole,
    pub source: RepresentationSource,
}

impl RepresentationInput {
    pub fn directory(role: RepresentationRole, dir: impl Into<PathBuf>) -> Self {
        Self {
            role,
            source: RepresentationSource::Directory(dir.into()),
        }
    }

    pub fn json(role: RepresentationRole, nodes: serde_json::Value) -> Self {
        Self {
            role,
            source: RepresentationSource::Json(nodes),
        }
    }
}

/// A checksum value and the algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixity {
    pub algorithm: FixityAlgorithm,
    pub value: String,
}

/// A file discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// 1-based position within its representation, in discovery order.
    pub ordinal: u32,
    pub original_name: String,
    /// Absolute path, or the path as supplied in JSON (forward slashes).
    pub original_path: String,
    /// Path relative to the input root, forward slashes.
    pub location: String,
    pub label: String,
    pub size_bytes: Option<u64>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub fixity: Option<Fixity>,
    pub note: Option<String>,
    /// Provenance events supplied for this file.
    pub events: Vec<DnxRecord>,
}

/// Display label for a file.
///
/// An explicit label is used verbatim. Otherwise the file name loses its final
/// extension only: `presmaster.jpg` becomes `presmaster`, `a.tar.gz` becomes
/// `a.tar`.
pub fn display_label(file_name: &str, explicit: Option<&str>) -> String {
    if let Some(label) = explicit {
        return label.to_string();
    }
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
