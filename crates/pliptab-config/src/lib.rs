//! # pliptab-config
//!
//! **Tier 4 (Configuration)**
//!
//! Clap definitions for the `pliptab` command line.
//!
//! ## What belongs here
//! * Clap `Parser` structs
//! * Default values and enums exposed on the command line
//!
//! ## What does NOT belong here
//! * Business logic
//! * I/O operations
//! * Validation beyond what clap does (see `RunSettings::validate`)

use std::path::PathBuf;

use clap::Parser;
use pliptab_settings::{DEFAULT_OUTPUT, DEFAULT_TOOL};
pub use pliptab_types::{ColumnOrder, ToolVerbosity};

/// `pliptab` runs PLIP over every `.pdb` file in a folder and writes one
/// table of interaction counts per category and file.
#[derive(Parser, Debug, Clone)]
#[command(name = "pliptab", version, about, long_about = None)]
pub struct Cli {
    /// Folder containing the structure files.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Output CSV path.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Column order of the output table.
    #[arg(long, value_enum, default_value_t = ColumnOrder::Total)]
    pub order: ColumnOrder,

    /// Kill a tool run after this many seconds (default: wait forever).
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Tool verbosities to try, in order, until a report is found.
    ///
    /// Examples:
    ///   --attempts quiet
    ///   --attempts quiet,verbose
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [ToolVerbosity::Quiet, ToolVerbosity::Verbose]
    )]
    pub attempts: Vec<ToolVerbosity>,

    /// PLIP executable to run.
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_TOOL)]
    pub tool: PathBuf,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose logging (repeat for more detail).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
