//! Administrative-metadata blocks.
//!
//! Every `mets:amdSec` carries exactly four subsections (technical, rights,
//! source, provenance). A subsection without a payload still gets an empty
//! `<dnx/>` so none of them is ever empty.

use crate::dnx::empty_dnx;
use crate::mets::{self, MdType};
use crate::xml::Element;

/// Optional payloads for the four subsections.
#[derive(Debug, Clone, Default)]
pub struct AmdPayloads {
    pub tech: Option<Element>,
    pub rights: Option<Element>,
    pub source: Option<Element>,
    pub digiprov: Option<Element>,
}

impl AmdPayloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tech(mut self, tech: Option<Element>) -> Self {
        self.tech = tech;
        self
    }

    pub fn with_rights(mut self, rights: Option<Element>) -> Self {
        self.rights = rights;
        self
    }

    pub fn with_source(mut self, source: Option<Element>) -> Self {
        self.source = source;
        self
    }

    pub fn with_digiprov(mut self, digiprov: Option<Element>) -> Self {
        self.digiprov = digiprov;
        self
    }
}

/// Subsection element names paired with their identifier suffixes.
pub const SUBSECTIONS: [(&str, &str); 4] = [
    ("mets:techMD", "tech"),
    ("mets:rightsMD", "rights"),
    ("mets:sourceMD", "source"),
    ("mets:digiprovMD", "digiprov"),
];

/// Build an `amdSec` with ID `id`.
pub fn build_amd_sec(id: &str, payloads: AmdPayloads) -> Element {
    let AmdPayloads {
        tech,
        rights,
        source,
        digiprov,
    } = payloads;

    let subsections = SUBSECTIONS
        .iter()
        .zip([tech, rights, source, digiprov])
        .map(|((name, suffix), payload)| {
            Element::new(*name)
                .with_attr("ID", format!("{}-{}", id, suffix))
                .with_child(mets::md_wrap(
                    MdType::Dnx,
                    payload.unwrap_or_else(empty_dnx),
                ))
        });

    mets::amd_sec(id).with_children(subsections)
}
