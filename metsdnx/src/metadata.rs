//! Item-level (IE) metadata supplied by the caller.

use serde::Deserialize;
use serde_json::Value;

use crate::amd::AmdPayloads;
use crate::dnx::{
    self, DnxSection, ACCESS_RIGHTS_POLICY, CMS, EVENT, GENERAL_IE_CHARACTERISTICS,
    OBJECT_IDENTIFIER, WEB_HARVESTING,
};
use crate::error::{BuildError, BuildResult};

/// Descriptive and administrative metadata for the intellectual entity.
///
/// Deserializes from the JSON shape accepted by the command line:
///
/// ```json
/// {
///   "dc": {"dc:title": "Annual report", "dc:date": "2019"},
///   "generalIECharacteristics": {"IEEntityType": "AnnualReport"},
///   "accessRightsPolicy": {"policyId": "100"},
///   "events": [{"eventType": "CREATE", "eventDescription": "Harvested"}],
///   "source": {"sourceSystem": {"system": "ingest-portal"}}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IeMetadata {
    /// Dublin Core dictionary, or a list holding one.
    #[serde(default)]
    pub dc: Option<Value>,
    #[serde(default, rename = "generalIECharacteristics")]
    pub general_ie_characteristics: Option<Value>,
    #[serde(default, rename = "objectIdentifier")]
    pub object_identifier: Option<Value>,
    #[serde(default, rename = "CMS")]
    pub cms: Option<Value>,
    #[serde(default, rename = "webHarvesting")]
    pub web_harvesting: Option<Value>,
    #[serde(default, rename = "accessRightsPolicy")]
    pub access_rights_policy: Option<Value>,
    /// Provenance events.
    #[serde(default, alias = "eventList")]
    pub events: Option<Value>,
    /// Source-system linkage: DNX section id to record(s).
    #[serde(default)]
    pub source: Option<Value>,
}

impl IeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON text.
    pub fn from_json_str(text: &str) -> BuildResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_dc(mut self, dc: Value) -> Self {
        self.dc = Some(dc);
        self
    }

    pub fn with_general_ie_characteristics(mut self, value: Value) -> Self {
        self.general_ie_characteristics = Some(value);
        self
    }

    pub fn with_object_identifier(mut self, value: Value) -> Self {
        self.object_identifier = Some(value);
        self
    }

    pub fn with_cms(mut self, value: Value) -> Self {
        self.cms = Some(value);
        self
    }

    pub fn with_web_harvesting(mut self, value: Value) -> Self {
        self.web_harvesting = Some(value);
        self
    }

    pub fn with_access_rights_policy(mut self, value: Value) -> Self {
        self.access_rights_policy = Some(value);
        self
    }

    pub fn with_events(mut self, events: Value) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Payloads for the `ie-amd` block.
    pub fn amd_payloads(&self) -> BuildResult<AmdPayloads> {
        let tech = [
            (GENERAL_IE_CHARACTERISTICS, &self.general_ie_characteristics),
            (OBJECT_IDENTIFIER, &self.object_identifier),
            (CMS, &self.cms),
            (WEB_HARVESTING, &self.web_harvesting),
        ]
        .into_iter()
        .filter_map(|(id, value)| value.as_ref().map(|v| DnxSection::from_json(id, v)))
        .collect::<BuildResult<Vec<_>>>()?;

        let rights = section(ACCESS_RIGHTS_POLICY, &self.access_rights_policy)?;
        let digiprov = section(EVENT, &self.events)?;

        Ok(AmdPayloads::new()
            .with_tech(dnx::build_dnx(&tech))
            .with_rights(dnx::build_dnx(&rights))
            .with_source(dnx::build_dnx(&self.source_sections()?))
            .with_digiprov(dnx::build_dnx(&digiprov)))
    }

    fn source_sections(&self) -> BuildResult<Vec<DnxSection>> {
        match &self.source {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(sections)) => {
                let mut ids: Vec<&String> = sections.keys().collect();
                ids.sort();
                ids.into_iter()
                    .map(|id| DnxSection::from_json(id.as_str(), &sections[id.as_str()]))
                    .collect()
            }
            Some(other) => Err(BuildError::InvalidJson(format!(
                "source metadata must map section ids to records, got {}",
                other
            ))),
        }
    }
}

fn section(id: &str, value: &Option<Value>) -> BuildResult<Vec<DnxSection>> {
    value
        .as_ref()
        .map(|v| DnxSection::from_json(id, v))
        .into_iter()
        .collect()
}
