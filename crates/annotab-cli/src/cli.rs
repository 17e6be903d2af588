//! CLI argument definitions for the annotab compiler.

use std::path::PathBuf;

use annotab_model::AnnotationPath;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "annotab",
    version,
    about = "Compile OData UI annotations into table descriptors",
    long_about = "Compile OData UI annotations and manifest overrides into a table\n\
                  descriptor: columns, toolbar actions, selection mode and table\n\
                  configuration, printed as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile the table of one entity set.
    Compile(CompileArgs),

    /// List entity sets and their line items.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct CompileArgs {
    /// Service metadata snapshot (JSON).
    #[arg(long = "metadata", value_name = "JSON")]
    pub metadata: PathBuf,

    /// Page manifest settings (JSON).
    #[arg(long = "manifest", value_name = "JSON")]
    pub manifest: PathBuf,

    /// Entity set the page is bound to.
    #[arg(long = "entity-set", value_name = "NAME")]
    pub entity_set: String,

    /// Navigation from the entity set to the table rows, e.g. `_Items`.
    #[arg(long = "navigation-path", value_name = "PATH")]
    pub navigation_path: Option<String>,

    /// Line item annotation to render, e.g. `@UI.LineItem#Open`.
    #[arg(long = "line-item", value_name = "PATH")]
    pub line_item: Option<AnnotationPath>,

    /// Presentation variant annotation, e.g. `@UI.PresentationVariant#Default`.
    #[arg(long = "presentation-variant", value_name = "PATH")]
    pub presentation_variant: Option<AnnotationPath>,

    /// Compile options (TOML). Defaults apply when omitted.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Write the descriptor to a file instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print column, action and diagnostics tables after compiling.
    #[arg(long = "summary")]
    pub summary: bool,

    /// Fail when any medium or high diagnostic is raised.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Service metadata snapshot (JSON).
    #[arg(long = "metadata", value_name = "JSON")]
    pub metadata: PathBuf,
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
