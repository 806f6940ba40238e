//! File command - build a document around a single file.

use std::path::PathBuf;

use clap::Args;
use metsdnx::{Element, SipBuilder};

use crate::error::CliError;

/// Arguments for `metsdnx file`.
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File to package as the preservation master
    pub path: PathBuf,
}

/// Run the file command.
pub fn run(builder: &SipBuilder, args: FileArgs) -> Result<Element, CliError> {
    Ok(builder.build_single_file(&args.path)?)
}
