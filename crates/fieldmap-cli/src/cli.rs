//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Map CSV or spreadsheet columns onto XML Schema leaf elements",
    long_about = "Map the columns of a CSV file or spreadsheet onto the leaf elements of one or more XML Schemas.\n\n\
                  Suggests a target path and confidence score per column, applies reviewer\n\
                  edits and packages a workbook plus HTML reports into a zip bundle."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow source sample values to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Flatten schemas and list their leaf target paths.
    Targets(TargetsArgs),

    /// Suggest a mapping for a source file and show the review summary.
    Preview(PreviewArgs),

    /// Suggest, apply edits, finalize and write the report bundle.
    Map(MapArgs),
}

#[derive(Args)]
pub struct TargetsArgs {
    /// XML Schema file (repeat for several schemas).
    #[arg(long = "xsd", value_name = "XSD", required = true)]
    pub xsd: Vec<PathBuf>,

    /// Print the target dictionary as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct InputArgs {
    /// XML Schema file (repeat for several schemas).
    #[arg(long = "xsd", value_name = "XSD", required = true)]
    pub xsd: Vec<PathBuf>,

    /// Source CSV file, or an .xlsx/.xls/.ods workbook (first worksheet).
    #[arg(long = "source", value_name = "FILE")]
    pub source: PathBuf,

    /// Project name used for output file names.
    #[arg(long = "project", value_name = "NAME")]
    pub project: Option<String>,

    /// Never call the ranking service, even when it is configured.
    #[arg(long = "offline")]
    pub offline: bool,

    /// Timeout of the ranking service call in seconds.
    #[arg(long = "ai-timeout-secs", value_name = "SECS")]
    pub ai_timeout_secs: Option<u64>,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the preview payload as JSON to this file.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// JSON file with reviewer edits (`[{"SourceField": .., "TargetPath": ..}]`).
    #[arg(long = "edits", value_name = "PATH")]
    pub edits: Option<PathBuf>,

    /// Text file with reviewer notes to include in the bundle.
    #[arg(long = "notes", value_name = "PATH")]
    pub notes: Option<PathBuf>,

    /// Path of the zip bundle to write.
    #[arg(long = "output", value_name = "ZIP")]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn map_requires_output_and_collects_schemas() {
        let cli = Cli::try_parse_from([
            "fieldmap", "map", "--xsd", "a.xsd", "--xsd", "b.xsd", "--source", "s.csv",
            "--output", "out.zip", "--offline",
        ])
        .expect("parse");
        let Command::Map(args) = cli.command else {
            panic!("expected map command");
        };
        assert_eq!(args.input.xsd.len(), 2);
        assert!(args.input.offline);
        assert!(args.edits.is_none());

        assert!(
            Cli::try_parse_from(["fieldmap", "map", "--xsd", "a.xsd", "--source", "s.csv"])
                .is_err()
        );
    }
}
