//! Json command - build a document from JSON representation trees.

use std::path::{Path, PathBuf};

use clap::Args;
use metsdnx::{Element, SipBuilder};
use serde_json::Value;

use super::common::read_json;
use crate::error::CliError;

/// Arguments for `metsdnx json`.
#[derive(Debug, Args)]
pub struct JsonArgs {
    /// Preservation master node list
    #[arg(long, value_name = "FILE")]
    pub pm: Option<PathBuf>,

    /// Modified master node list
    #[arg(long, value_name = "FILE")]
    pub mm: Option<PathBuf>,

    /// Access derivative node list
    #[arg(long, value_name = "FILE")]
    pub ad: Option<PathBuf>,
}

/// Run the json command.
pub fn run(builder: &SipBuilder, args: JsonArgs) -> Result<Element, CliError> {
    let pm = load(args.pm.as_deref())?;
    let mm = load(args.mm.as_deref())?;
    let ad = load(args.ad.as_deref())?;
    Ok(builder.build_from_json(pm.as_ref(), mm.as_ref(), ad.as_ref())?)
}

fn load(path: Option<&Path>) -> Result<Option<Value>, CliError> {
    path.map(read_json).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builds_three_representations() {
        let temp = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for name in ["pm", "mm", "ad"] {
            let path = temp.path().join(format!("{}.json", name));
            fs::write(
                &path,
                format!(r#"[{{"type": "file", "name": "{}.tif"}}]"#, name),
            )
            .unwrap();
            paths.push(path);
        }

        let args = JsonArgs {
            pm: Some(paths[0].clone()),
            mm: Some(paths[1].clone()),
            ad: Some(paths[2].clone()),
        };
        let document = run(&SipBuilder::default(), args).unwrap();
        for id in ["rep1-1", "rep2-1", "rep3-1"] {
            assert!(document.find_by_id(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let args = JsonArgs {
            pm: Some(PathBuf::from("/nonexistent/pm.json")),
            mm: None,
            ad: None,
        };
        let err = run(&SipBuilder::default(), args).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
