//! Dir command - build a document from representation directories.

use std::path::PathBuf;

use clap::Args;
use metsdnx::{Element, SipBuilder};

use crate::error::CliError;

/// Arguments for `metsdnx dir`.
#[derive(Debug, Args)]
pub struct DirArgs {
    /// Preservation master directory
    #[arg(long, value_name = "DIR")]
    pub pm: Option<PathBuf>,

    /// Modified master directory
    #[arg(long, value_name = "DIR")]
    pub mm: Option<PathBuf>,

    /// Access derivative directory
    #[arg(long, value_name = "DIR")]
    pub ad: Option<PathBuf>,
}

/// Run the dir command.
pub fn run(builder: &SipBuilder, args: DirArgs) -> Result<Element, CliError> {
    Ok(builder.build_from_directories(
        args.pm.as_deref(),
        args.mm.as_deref(),
        args.ad.as_deref(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builds_from_directory() {
        let temp = TempDir::new().unwrap();
        let pm = temp.path().join("pm");
        fs::create_dir_all(&pm).unwrap();
        fs::write(pm.join("page.tif"), b"page").unwrap();

        let args = DirArgs {
            pm: Some(pm),
            mm: None,
            ad: None,
        };
        let document = run(&SipBuilder::default(), args).unwrap();
        assert!(document.find_by_id("fid1-1").is_some());
    }

    #[test]
    fn test_no_directories_is_an_error() {
        let args = DirArgs {
            pm: None,
            mm: None,
            ad: None,
        };
        assert!(run(&SipBuilder::default(), args).is_err());
    }
}
