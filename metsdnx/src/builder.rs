//! Document assembly.
//!
//! [`SipBuilder`] is the entry point for every build. All representations are
//! walked first; only then are the administrative blocks, file section and
//! structural maps assembled from the finished trees. The result is
//! normalized and checked for dangling references before it is returned.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::amd::{build_amd_sec, AmdPayloads};
use crate::config::BuildConfig;
use crate::dc::build_dc_record;
use crate::dnx;
use crate::error::{BuildError, BuildResult};
use crate::ids::{self, amd_id, struct_map_id, AmdScope, IdRegistry, IE_DMD_ID};
use crate::inventory;
use crate::mets::{self, MetsDocument};
use crate::metadata::IeMetadata;
use crate::representation::{RepresentationInput, RepresentationRole, RepresentationSource};
use crate::structmap::build_struct_map;
use crate::walk::{self, JsonWalkOptions, WalkedTree};
use crate::xml::Element;

/// Builds METS/DNX documents.
#[derive(Debug, Clone, Default)]
pub struct SipBuilder {
    config: BuildConfig,
    metadata: IeMetadata,
}

impl SipBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            metadata: IeMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: IeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn metadata(&self) -> &IeMetadata {
        &self.metadata
    }

    /// Build from representation directories.
    ///
    /// Representations are numbered in role order, skipping absent roles:
    /// with only a modified master and an access derivative, those become
    /// `rep1` and `rep2`.
    pub fn build_from_directories(
        &self,
        preservation_master: Option<&Path>,
        modified_master: Option<&Path>,
        access_derivative: Option<&Path>,
    ) -> BuildResult<Element> {
        let inputs = roles()
            .into_iter()
            .zip([preservation_master, modified_master, access_derivative])
            .filter_map(|(role, dir)| dir.map(|d| RepresentationInput::directory(role, d)))
            .collect();
        self.build(inputs)
    }

    /// Build from JSON node lists, one per role.
    pub fn build_from_json(
        &self,
        preservation_master: Option<&Value>,
        modified_master: Option<&Value>,
        access_derivative: Option<&Value>,
    ) -> BuildResult<Element> {
        let inputs = roles()
            .into_iter()
            .zip([preservation_master, modified_master, access_derivative])
            .filter_map(|(role, nodes)| nodes.map(|n| RepresentationInput::json(role, n.clone())))
            .collect();
        self.build(inputs)
    }

    /// Build a document around one file as a preservation master.
    pub fn build_single_file(&self, path: &Path) -> BuildResult<Element> {
        let tree = walk::walk_file(path, self.config.fixity_algorithm)?;
        self.assemble(vec![(RepresentationRole::PreservationMaster, tree)])
    }

    /// Build from any ordered list of representations.
    pub fn build(&self, inputs: Vec<RepresentationInput>) -> BuildResult<Element> {
        if inputs.is_empty() {
            return Err(BuildError::MissingInput(
                "at least one representation is required".to_string(),
            ));
        }

        let mut walked = Vec::with_capacity(inputs.len());
        for input in inputs {
            let tree = self.walk(&input.source)?;
            debug!(
                role = input.role.label(),
                files = tree.file_count(),
                "walked representation"
            );
            walked.push((input.role, tree));
        }
        self.assemble(walked)
    }

    fn walk(&self, source: &RepresentationSource) -> BuildResult<WalkedTree> {
        match source {
            RepresentationSource::Directory(dir) => walk::walk_directory(
                dir,
                self.config.input_dir.as_deref(),
                self.config.fixity_algorithm,
            ),
            RepresentationSource::Json(nodes) => {
                let options = JsonWalkOptions::new(self.config.input_dir.clone())
                    .with_algorithm(self.config.fixity_algorithm);
                walk::walk_json(nodes, &options)
            }
        }
    }

    fn assemble(&self, representations: Vec<(RepresentationRole, WalkedTree)>) -> BuildResult<Element> {
        let mut registry = IdRegistry::new();
        let mut document = MetsDocument::new();

        let dmd_id = registry.register(IE_DMD_ID)?;
        document
            .dmd_secs
            .push(mets::dmd_sec(&dmd_id, build_dc_record(self.metadata.dc.as_ref())?));

        let ie_amd = registry.register(amd_id(AmdScope::Ie))?;
        document.ie_amd = Some(build_amd_sec(&ie_amd, self.metadata.amd_payloads()?));

        let mode = self.config.structmap_type;
        let mut groups = Vec::with_capacity(representations.len());

        for (index, (role, tree)) in representations.iter().enumerate() {
            let rep = index as u32 + 1;
            info!(
                rep,
                role = role.label(),
                files = tree.file_count(),
                "assembling representation"
            );

            let rep_amd = registry.register(amd_id(AmdScope::Representation(rep)))?;
            let tech = dnx::rep_amd_tech(role.preservation_type(), self.config.digital_original);
            document
                .rep_amds
                .push(build_amd_sec(&rep_amd, AmdPayloads::new().with_tech(Some(tech))));

            for entry in tree.files() {
                let id = registry.register(amd_id(AmdScope::File {
                    file: entry.ordinal,
                    rep,
                }))?;
                let payloads = AmdPayloads::new()
                    .with_tech(Some(dnx::file_amd_tech(entry)))
                    .with_digiprov(dnx::file_amd_digiprov(entry));
                document.file_amds.push(build_amd_sec(&id, payloads));
            }

            groups.push(inventory::file_group(rep, tree, &mut registry)?);

            for kind in mode.kinds() {
                let id = registry.register(struct_map_id(rep, *kind, mode))?;
                document
                    .struct_maps
                    .push(build_struct_map(&id, rep, role, tree, *kind));
            }
        }
        document.file_sec = Some(inventory::file_sec(groups));

        let mut root = document.into_element();
        ids::normalize(&mut root);
        ids::check_references(&root)?;

        info!(
            representations = representations.len(),
            identifiers = registry.len(),
            structmap_type = %mode,
            "document assembled"
        );
        Ok(root)
    }
}

fn roles() -> [RepresentationRole; 3] {
    [
        RepresentationRole::PreservationMaster,
        RepresentationRole::ModifiedMaster,
        RepresentationRole::AccessDerivative,
    ]
}
