//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Compile wolf component files into TypeScript modules
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "wolfc")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Files or directories to compile (defaults to the current directory)
    pub paths: Vec<PathBuf>,

    /// Directory to write generated files to, mirroring the input layout
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Module generated code imports runtime helpers from
    #[arg(long)]
    pub runtime_module: Option<String>,

    /// Path to wolfc.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Report diagnostics without writing any files
    #[arg(long)]
    pub check: bool,

    /// Recompile when component files change
    #[arg(short, long)]
    pub watch: bool,

    /// Fail on warnings
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Graphical reports with source excerpts
    #[default]
    Human,
    /// One JSON object per line
    Json,
}
