//! Command line front end.
//!
//! Plays the UI collaborator: it feeds text and files into a
//! `RecordSession`, prints the resulting table, and writes exports.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::RecordSession;
use crate::domain::app_config::{AppConfig, SchemaMode};
use crate::domain::error::{AppError, Result};
use crate::domain::fixed_profile::FixedProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Dynamic,
    Fixed,
}

impl From<ModeArg> for SchemaMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dynamic => SchemaMode::Dynamic,
            ModeArg::Fixed => SchemaMode::Fixed,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "recordsheet", version, about = "Turn pasted key/value blocks into spreadsheets")]
pub struct Cli {
    /// Configuration file (defaults to ./recordsheet.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured schema mode
    #[arg(long, value_enum, global = true)]
    pub mode: Option<ModeArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a text file ("-" for stdin) into records
    Parse {
        input: PathBuf,

        /// Write the records to this .xlsx or .csv file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import one or more spreadsheet files (.xlsx, .xls, .ods, .csv)
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the merged records to this .xlsx or .csv file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the fixed-schema column layout
    Headers,
}

async fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    tokio::fs::read_to_string(input)
        .await
        .map_err(|e| AppError::FileReadFailure(format!("{}: {}", input.display(), e)))
}

fn print_table(session: &RecordSession) {
    if session.is_empty() {
        println!("No data loaded.");
        return;
    }
    println!("{}", session.table().to_text());
    println!("{} record(s) loaded.", session.len());
}

fn export_if_requested(session: &mut RecordSession, out: Option<PathBuf>) -> Result<()> {
    if let Some(out) = out {
        let written = session.export_to_file(Some(&out))?;
        println!("Exported to {}", written.display());
    }
    Ok(())
}

pub async fn execute(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Parse { input, out } => {
            let mut session = RecordSession::new(config)?;
            let text = read_input(&input).await?;
            session.parse_and_add(&text)?;
            print_table(&session);
            export_if_requested(&mut session, out)
        }
        Command::Import { files, out, json } => {
            let mut session = RecordSession::new(config)?;
            for file in &files {
                session.import_file(file).await?;
            }
            if json {
                let rendered = serde_json::to_string_pretty(session.records())
                    .map_err(|e| AppError::ExportFailure(e.to_string()))?;
                println!("{}", rendered);
            } else {
                print_table(&session);
            }
            export_if_requested(&mut session, out)
        }
        Command::Headers => {
            let profile = FixedProfile::builtin();
            for (idx, header) in profile.headers().iter().enumerate() {
                let label = if header.is_empty() { "(spacer)" } else { header.as_str() };
                println!("{}\t{}", idx, label);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_args() {
        let cli = Cli::try_parse_from([
            "recordsheet",
            "--mode",
            "fixed",
            "parse",
            "listing.txt",
            "--out",
            "out.xlsx",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(ModeArg::Fixed));
        match cli.command {
            Command::Parse { input, out } => {
                assert_eq!(input, PathBuf::from("listing.txt"));
                assert_eq!(out, Some(PathBuf::from("out.xlsx")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_a_file() {
        assert!(Cli::try_parse_from(["recordsheet", "import"]).is_err());
    }

    #[tokio::test]
    async fn test_parse_command_writes_export() {
        let dir = std::env::temp_dir();
        let input = dir.join("recordsheet_cli_input.txt");
        let out = dir.join("recordsheet_cli_output.csv");
        std::fs::write(&input, "编号：1\n段位：黑鹰\n编号：2\n等级：30").unwrap();

        execute(
            Command::Parse {
                input: input.clone(),
                out: Some(out.clone()),
            },
            AppConfig::default(),
        )
        .await
        .unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("编号,段位,等级"));
        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&out);
    }

    #[tokio::test]
    async fn test_parse_command_surfaces_errors() {
        let input = std::env::temp_dir().join("recordsheet_cli_bad_input.txt");
        std::fs::write(&input, "段位：黑鹰").unwrap();
        let err = execute(
            Command::Parse {
                input: input.clone(),
                out: None,
            },
            AppConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, AppError::NoRecordsFound);
        let _ = std::fs::remove_file(&input);
    }
}
