//! DNX metadata sections.
//!
//! A DNX block is a list of named sections, each holding records of
//! `key id -> value` pairs:
//!
//! ```text
//! <dnx xmlns="http://www.exlibrisgroup.com/dps/dnx">
//!   <section id="generalFileCharacteristics">
//!     <record>
//!       <key id="fileOriginalPath">pm/presmaster.jpg</key>
//!     </record>
//!   </section>
//! </dnx>
//! ```
//!
//! Records built from JSON objects are ordered by [`section_fields`], never by
//! whatever order the parsed object happens to iterate in.

use serde_json::{Map, Value};

use crate::error::{BuildError, BuildResult};
use crate::representation::{FileEntry, PreservationType};
use crate::xml::Element;

/// DNX namespace.
pub const DNX_NS: &str = "http://www.exlibrisgroup.com/dps/dnx";

pub const GENERAL_IE_CHARACTERISTICS: &str = "generalIECharacteristics";
pub const OBJECT_IDENTIFIER: &str = "objectIdentifier";
pub const CMS: &str = "CMS";
pub const WEB_HARVESTING: &str = "webHarvesting";
pub const ACCESS_RIGHTS_POLICY: &str = "accessRightsPolicy";
pub const EVENT: &str = "event";
pub const GENERAL_REP_CHARACTERISTICS: &str = "generalRepCharacteristics";
pub const GENERAL_FILE_CHARACTERISTICS: &str = "generalFileCharacteristics";
pub const FILE_FIXITY: &str = "fileFixity";

/// Known keys of a section, in the order they are emitted.
///
/// Keys a caller supplies outside this list are emitted afterwards in lexical
/// order.
pub fn section_fields(section: &str) -> &'static [&'static str] {
    match section {
        GENERAL_IE_CHARACTERISTICS => &[
            "submissionReason",
            "status",
            "statusDate",
            "IEEntityType",
            "UserDefinedA",
            "UserDefinedB",
            "UserDefinedC",
        ],
        OBJECT_IDENTIFIER => &["objectIdentifierType", "objectIdentifierValue"],
        CMS => &["system", "recordId"],
        WEB_HARVESTING => &[
            "primarySeedURL",
            "WCTIdentifier",
            "targetName",
            "group",
            "harvestDate",
            "harvestTime",
        ],
        ACCESS_RIGHTS_POLICY => &["policyId", "policyParameters", "policyDescription"],
        EVENT => &[
            "eventIdentifierType",
            "eventIdentifierValue",
            "eventType",
            "eventDescription",
            "eventDateTime",
            "eventOutcome1",
            "eventOutcomeDetail1",
        ],
        GENERAL_REP_CHARACTERISTICS => &[
            "preservationType",
            "usageType",
            "RevisionNumber",
            "DigitalOriginal",
        ],
        GENERAL_FILE_CHARACTERISTICS => &[
            "label",
            "note",
            "fileCreationDate",
            "fileModificationDate",
            "fileSizeBytes",
            "fileOriginalName",
            "fileOriginalPath",
        ],
        FILE_FIXITY => &["fixityType", "fixityValue"],
        _ => &[],
    }
}

/// One record: ordered `key -> value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnxRecord {
    fields: Vec<(String, String)>,
}

impl DnxRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a field only when a value is present.
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object, ordered by the section's schema.
    pub fn from_json_object(section: &str, object: &Map<String, Value>) -> Self {
        let known = section_fields(section);
        let mut record = DnxRecord::new();

        for key in known {
            if let Some(value) = object.get(*key).and_then(render_value) {
                record.push(*key, value);
            }
        }

        let mut extra: Vec<&String> = object
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .collect();
        extra.sort();
        for key in extra {
            if let Some(value) = object.get(key).and_then(render_value) {
                record.push(key.clone(), value);
            }
        }
        record
    }

    fn to_element(&self) -> Element {
        Element::new("record").with_children(
            self.fields
                .iter()
                .map(|(k, v)| Element::new("key").with_attr("id", k).with_text(v)),
        )
    }
}

/// Render a JSON scalar as DNX text. `null` yields nothing.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// A named DNX section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnxSection {
    id: String,
    records: Vec<DnxRecord>,
}

impl DnxSection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: DnxRecord) -> Self {
        if !record.is_empty() {
            self.records.push(record);
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn records(&self) -> &[DnxRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a section from a JSON object or a list of objects.
    pub fn from_json(id: impl Into<String>, value: &Value) -> BuildResult<Self> {
        let id = id.into();
        let mut section = DnxSection::new(id.clone());
        match value {
            Value::Object(object) => {
                section = section.with_record(DnxRecord::from_json_object(&id, object));
            }
            Value::Array(items) => {
                for item in items {
                    let object = item.as_object().ok_or_else(|| {
                        BuildError::InvalidJson(format!(
                            "records of section '{}' must be objects, got {}",
                            id, item
                        ))
                    })?;
                    section = section.with_record(DnxRecord::from_json_object(&id, object));
                }
            }
            Value::Null => {}
            other => {
                return Err(BuildError::InvalidJson(format!(
                    "section '{}' must be an object or a list of objects, got {}",
                    id, other
                )))
            }
        }
        Ok(section)
    }

    fn to_element(&self) -> Element {
        Element::new("section")
            .with_attr("id", &self.id)
            .with_children(self.records.iter().map(DnxRecord::to_element))
    }
}

/// An empty `<dnx/>` element, used where a subsection has no payload.
pub fn empty_dnx() -> Element {
    Element::new("dnx").with_attr("xmlns", DNX_NS)
}

/// Render sections into a `<dnx>` element. Sections without records are
/// left out; `None` when nothing remains.
pub fn build_dnx(sections: &[DnxSection]) -> Option<Element> {
    let mut dnx = empty_dnx();
    for section in sections.iter().filter(|s| !s.is_empty()) {
        dnx.push(section.to_element());
    }
    if dnx.is_empty() {
        None
    } else {
        Some(dnx)
    }
}

/// Technical metadata for a representation.
pub fn rep_amd_tech(preservation_type: PreservationType, digital_original: bool) -> Element {
    let record = DnxRecord::new()
        .with("preservationType", preservation_type.as_str())
        .with("usageType", "VIEW")
        .with("RevisionNumber", "1")
        .with("DigitalOriginal", digital_original.to_string());
    let section = DnxSection::new(GENERAL_REP_CHARACTERISTICS).with_record(record);
    build_dnx(&[section]).unwrap_or_else(empty_dnx)
}

/// Technical metadata for a file: general characteristics and fixity.
pub fn file_amd_tech(entry: &FileEntry) -> Element {
    let characteristics = DnxRecord::new()
        .with("label", &entry.label)
        .with_opt("note", entry.note.as_deref())
        .with_opt("fileCreationDate", entry.created.as_deref())
        .with_opt("fileModificationDate", entry.modified.as_deref())
        .with_opt("fileSizeBytes", entry.size_bytes.map(|s| s.to_string()))
        .with("fileOriginalName", &entry.original_name)
        .with("fileOriginalPath", &entry.original_path);

    let mut sections =
        vec![DnxSection::new(GENERAL_FILE_CHARACTERISTICS).with_record(characteristics)];
    if let Some(fixity) = &entry.fixity {
        let record = DnxRecord::new()
            .with("fixityType", fixity.algorithm.tag())
            .with("fixityValue", &fixity.value);
        sections.push(DnxSection::new(FILE_FIXITY).with_record(record));
    }
    build_dnx(&sections).unwrap_or_else(empty_dnx)
}

/// Provenance metadata for a file, when events were supplied.
pub fn file_amd_digiprov(entry: &FileEntry) -> Option<Element> {
    let section = entry
        .events
        .iter()
        .cloned()
        .fold(DnxSection::new(EVENT), DnxSection::with_record);
    build_dnx(&[section])
}
