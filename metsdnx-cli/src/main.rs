//! metsdnx CLI - Command-line interface
//!
//! Builds a METS/DNX submission document from representation directories,
//! a single file, or JSON representation trees, and writes it to stdout or
//! a file.

mod commands;
mod error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::common::{self, GlobalArgs};
use commands::{dir, file, json};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "metsdnx", version, about = "Build METS/DNX submission documents")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build from preservation master, modified master and access derivative directories
    Dir(dir::DirArgs),

    /// Build around a single file
    File(file::FileArgs),

    /// Build from JSON node lists, one file per representation
    Json(json::JsonArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = common::load_config_file(cli.global.config.as_deref())?;

    let level = cli
        .global
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let log_file = cli
        .global
        .log_file
        .clone()
        .or_else(|| config.logging.file.clone());
    let _logging = metsdnx::logging::init(&level, log_file.as_deref())?;

    let builder = common::builder(&cli.global, &config)?;
    let document = match cli.command {
        Commands::Dir(args) => dir::run(&builder, args)?,
        Commands::File(args) => file::run(&builder, args)?,
        Commands::Json(args) => json::run(&builder, args)?,
    };
    common::write_document(&document, cli.global.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "metsdnx",
            "json",
            "--pm",
            "pm.json",
            "--structmap-type",
            "both",
            "--digital-original",
        ])
        .unwrap();
        assert_eq!(cli.global.structmap_type.as_deref(), Some("both"));
        assert!(cli.global.digital_original);
        assert!(matches!(cli.command, Commands::Json(_)));
    }

    #[test]
    fn test_digital_original_flags_conflict() {
        let cli = Cli::try_parse_from(["metsdnx", "dir", "--no-digital-original"]).unwrap();
        assert!(cli.global.no_digital_original);
        assert!(!cli.global.digital_original);

        let err = Cli::try_parse_from([
            "metsdnx",
            "dir",
            "--digital-original",
            "--no-digital-original",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_file_takes_a_path() {
        let cli = Cli::try_parse_from(["metsdnx", "file", "report.pdf"]).unwrap();
        match cli.command {
            Commands::File(args) => assert_eq!(args.path.to_str(), Some("report.pdf")),
            other => panic!("expected file command, got {:?}", other),
        }
    }
}
