//! # pliptab-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free settings for a pipeline run. The CLI layer builds a
//! [`RunSettings`] and hands it to the pipeline; nothing reads configuration
//! from process-wide state.
//!
//! ## What belongs here
//! * Settings types and their defaults
//! * Validation
//!
//! ## What does NOT belong here
//! * Clap parsing (use pliptab-config)
//! * I/O operations
//! * Business logic

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use pliptab_types::{ColumnOrder, ToolVerbosity};

/// Default output table path.
pub const DEFAULT_OUTPUT: &str = "combined_interaction_counts.csv";

/// Default structure-file extension (matched case-insensitively).
pub const DEFAULT_EXTENSION: &str = "pdb";

/// Default external tool executable.
pub const DEFAULT_TOOL: &str = "plipcmd.py";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Input folder must not be empty")]
    EmptyFolder,

    #[error("Output path must not be empty")]
    EmptyOutput,

    #[error("Tool executable must not be empty")]
    EmptyTool,

    #[error("Structure file extension must not be empty")]
    EmptyExtension,

    #[error("Timeout must be greater than zero seconds")]
    ZeroTimeout,

    #[error("Retry policy needs at least one attempt")]
    NoAttempts,
}

/// Ordered list of tool verbosities to try for one file.
///
/// The next attempt runs only when the previous one exited cleanly but its
/// output held no complete report. A policy always has a first attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    first: ToolVerbosity,
    fallbacks: Vec<ToolVerbosity>,
}

impl RetryPolicy {
    pub fn new(attempts: Vec<ToolVerbosity>) -> Result<Self, SettingsError> {
        let Some((&first, fallbacks)) = attempts.split_first() else {
            return Err(SettingsError::NoAttempts);
        };
        Ok(Self {
            first,
            fallbacks: fallbacks.to_vec(),
        })
    }

    pub fn first(&self) -> ToolVerbosity {
        self.first
    }

    /// Verbosities tried, in order, after the first attempt found no report.
    pub fn fallbacks(&self) -> &[ToolVerbosity] {
        &self.fallbacks
    }

    pub fn attempts(&self) -> Vec<ToolVerbosity> {
        std::iter::once(self.first)
            .chain(self.fallbacks.iter().copied())
            .collect()
    }

    pub fn max_attempts(&self) -> usize {
        1 + self.fallbacks.len()
    }
}

impl Default for RetryPolicy {
    /// Quiet first, then again without `-q`.
    fn default() -> Self {
        Self {
            first: ToolVerbosity::Quiet,
            fallbacks: vec![ToolVerbosity::Verbose],
        }
    }
}

/// Everything a single pipeline run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Directory holding the structure files.
    pub folder: PathBuf,

    /// Where the combined table is written.
    pub output: PathBuf,

    /// Structure-file extension, without the leading dot.
    pub extension: String,

    /// Column order of the output table.
    pub order: ColumnOrder,

    /// Per-invocation timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    pub retry: RetryPolicy,

    /// External tool executable (name on `PATH` or explicit path).
    pub tool: PathBuf,

    /// Show the progress spinner when attached to a terminal.
    pub progress: bool,
}

impl RunSettings {
    /// Settings for `folder` with every other option at its default.
    pub fn for_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            extension: DEFAULT_EXTENSION.to_string(),
            order: ColumnOrder::default(),
            timeout: None,
            retry: RetryPolicy::default(),
            tool: PathBuf::from(DEFAULT_TOOL),
            progress: true,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.folder.as_os_str().is_empty() {
            return Err(SettingsError::EmptyFolder);
        }
        if self.output.as_os_str().is_empty() {
            return Err(SettingsError::EmptyOutput);
        }
        if self.tool.as_os_str().is_empty() {
            return Err(SettingsError::EmptyTool);
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(SettingsError::EmptyExtension);
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }
}
