//! metsdnx - METS/DNX submission documents for preservation repositories
//!
//! This library assembles the METS document describing one intellectual
//! entity (IE): Dublin Core descriptive metadata, DNX administrative blocks
//! for the IE, each representation and each file, a file section, and
//! physical or logical structural maps.
//!
//! ```no_run
//! use std::path::Path;
//! use metsdnx::{BuildConfig, SipBuilder, StructMapType};
//!
//! let config = BuildConfig::new()
//!     .with_input_dir("/data/batch")
//!     .with_structmap_type(StructMapType::Both);
//! let document = SipBuilder::new(config).build_from_directories(
//!     Some(Path::new("/data/batch/pm")),
//!     None,
//!     Some(Path::new("/data/batch/ad")),
//! )?;
//! println!("{}", document.to_xml_string()?);
//! # Ok::<(), metsdnx::BuildError>(())
//! ```

pub mod amd;
pub mod builder;
pub mod config;
pub mod dc;
pub mod dnx;
pub mod error;
pub mod fixity;
pub mod ids;
pub mod inventory;
pub mod logging;
pub mod metadata;
pub mod mets;
pub mod representation;
pub mod structmap;
pub mod walk;
pub mod xml;

pub use builder::SipBuilder;
pub use config::{BuildConfig, ConfigFile};
pub use error::{BuildError, BuildResult};
pub use fixity::FixityAlgorithm;
pub use metadata::IeMetadata;
pub use representation::{RepresentationInput, RepresentationRole, StructMapType};
pub use xml::Element;
