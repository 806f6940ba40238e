//! Options and helpers shared by every build command.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::Value;
use tracing::info;

use metsdnx::{
    BuildConfig, ConfigFile, Element, FixityAlgorithm, IeMetadata, SipBuilder, StructMapType,
};

use crate::error::CliError;

/// Fixity algorithm selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FixityArg {
    /// MD5 (repository default)
    Md5,
    /// SHA-256
    Sha256,
}

impl From<FixityArg> for FixityAlgorithm {
    fn from(arg: FixityArg) -> Self {
        match arg {
            FixityArg::Md5 => FixityAlgorithm::Md5,
            FixityArg::Sha256 => FixityAlgorithm::Sha256,
        }
    }
}

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON file with IE metadata (dc, generalIECharacteristics, events, ...)
    #[arg(long, global = true, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Root that file locations are made relative to
    #[arg(long, global = true, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Structural maps to build: PHYSICAL, LOGICAL or BOTH
    #[arg(long, global = true, value_name = "TYPE")]
    pub structmap_type: Option<String>,

    /// Mark representations as digital originals
    #[arg(long, global = true)]
    pub digital_original: bool,

    /// Do not mark representations as digital originals, overriding the config
    #[arg(long, global = true, conflicts_with = "digital_original")]
    pub no_digital_original: bool,

    /// Checksum algorithm for computed fixity values
    #[arg(long, global = true, value_enum)]
    pub fixity: Option<FixityArg>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Load the config file named on the command line, or the default one.
pub fn load_config_file(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match path {
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load().unwrap_or_default()),
    }
}

/// Resolve build settings: CLI takes precedence, then config.
pub fn build_config(args: &GlobalArgs, config: &ConfigFile) -> BuildConfig {
    let mut build = config.apply(BuildConfig::new());
    if let Some(input_dir) = &args.input_dir {
        build = build.with_input_dir(input_dir);
    }
    if let Some(mode) = &args.structmap_type {
        build = build.with_structmap_type(StructMapType::parse_lenient(mode));
    }
    if args.digital_original {
        build = build.with_digital_original(true);
    } else if args.no_digital_original {
        build = build.with_digital_original(false);
    }
    if let Some(fixity) = args.fixity {
        build = build.with_fixity_algorithm(fixity.into());
    }
    build
}

/// Create the builder for a command.
pub fn builder(args: &GlobalArgs, config: &ConfigFile) -> Result<SipBuilder, CliError> {
    let metadata = match &args.metadata {
        Some(path) => {
            let value = read_json(path)?;
            serde_json::from_value::<IeMetadata>(value).map_err(|e| CliError::Json {
                path: path.clone(),
                reason: e.to_string(),
            })?
        }
        None => IeMetadata::default(),
    };
    Ok(SipBuilder::new(build_config(args, config)).with_metadata(metadata))
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| CliError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize the document to `output`, or stdout.
pub fn write_document(document: &Element, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let file = fs::File::create(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let mut out = io::BufWriter::new(file);
            document.write_document(&mut out)?;
            out.flush().map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "document written");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            document.write_document(&mut out)?;
            writeln!(out)
                .and_then(|()| out.flush())
                .map_err(|source| CliError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
    }
    Ok(())
}
