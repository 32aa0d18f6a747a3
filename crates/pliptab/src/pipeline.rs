//! The per-file loop: enumerate, invoke, scrape, aggregate, write.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use thiserror::Error;
use tracing::{debug, info, warn};

use pliptab_invoke::{InvokeError, ToolCommand, invoke};
use pliptab_progress::FileProgress;
use pliptab_report::{MarkerPair, ReportError, ReportLocator, TallyError, scrape};
use pliptab_settings::RunSettings;
use pliptab_types::{AggregateTable, FileReport, ToolVerbosity};

/// Why a single file was left out of the table.
#[derive(Debug, Error)]
pub enum FileFailure {
    #[error(transparent)]
    Tool(#[from] InvokeError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Coarse failure class, for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FailureKind {
    ChildProcess,
    Extraction,
    Parse,
    MissingInteractions,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ChildProcess => f.write_str("child-process failure"),
            FailureKind::Extraction => f.write_str("no report in output"),
            FailureKind::Parse => f.write_str("malformed report"),
            FailureKind::MissingInteractions => f.write_str("no interactions element"),
        }
    }
}

impl FileFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            FileFailure::Tool(_) => FailureKind::ChildProcess,
            FileFailure::Report(ReportError::Extract(_)) => FailureKind::Extraction,
            FileFailure::Report(ReportError::Parse(_)) => FailureKind::Parse,
            FileFailure::Report(ReportError::Tally(TallyError::MissingInteractions)) => {
                FailureKind::MissingInteractions
            }
        }
    }
}

#[derive(Debug)]
pub struct SkippedFile {
    pub file: String,
    pub failure: FileFailure,
}

/// What happened across the whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files that matched the extension filter.
    pub discovered: usize,
    pub skipped: Vec<SkippedFile>,
    /// Extra tool runs triggered by the retry policy.
    pub retries: usize,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.discovered - self.skipped.len()
    }

    /// Skip counts per failure class.
    pub fn failure_counts(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.failure.kind()).or_insert(0) += 1;
        }
        counts
    }

    fn describe_failures(&self) -> String {
        self.failure_counts()
            .into_iter()
            .map(|(kind, n)| format!("{n} {kind}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub table: AggregateTable,
    pub summary: RunSummary,
    pub output: PathBuf,
}

/// Runs the tool over files and scrapes each output.
pub struct Pipeline<'a, L: ReportLocator = MarkerPair> {
    settings: &'a RunSettings,
    tool: ToolCommand,
    locator: L,
}

impl<'a> Pipeline<'a, MarkerPair> {
    pub fn new(settings: &'a RunSettings) -> Self {
        Self::with_locator(settings, MarkerPair::default())
    }
}

impl<'a, L: ReportLocator> Pipeline<'a, L> {
    pub fn with_locator(settings: &'a RunSettings, locator: L) -> Self {
        Self {
            settings,
            tool: ToolCommand::new(&settings.tool),
            locator,
        }
    }

    /// Process every file in order. A failure only drops that file.
    pub fn collect(&self, files: &[PathBuf], progress: &FileProgress) -> (AggregateTable, RunSummary) {
        let mut table = AggregateTable::new();
        let mut summary = RunSummary {
            discovered: files.len(),
            ..RunSummary::default()
        };

        for path in files {
            let name = file_label(path);
            progress.set_message(name.clone());
            progress.println(format!("Processing {name}..."));

            match self.process_file(path, &mut summary.retries) {
                Ok(report) => {
                    debug!(file = %name, total = report.total(), "tallied");
                    table.insert(name, report);
                }
                Err(failure) => {
                    log_skip(&name, &failure);
                    summary.skipped.push(SkippedFile {
                        file: name,
                        failure,
                    });
                }
            }
            progress.inc();
        }

        (table, summary)
    }

    /// Try each attempt of the retry policy until one yields a report.
    ///
    /// A tool failure ends the file at once; only a missing report moves on
    /// to the next attempt.
    pub fn process_file(&self, path: &Path, retries: &mut usize) -> Result<FileReport, FileFailure> {
        let name = file_label(path);
        let retry = &self.settings.retry;
        let mut outcome = self.attempt(path, retry.first());

        for (index, &verbosity) in retry.fallbacks().iter().enumerate() {
            match &outcome {
                Err(FileFailure::Report(err)) if err.is_missing_report() => {}
                _ => break,
            }
            *retries += 1;
            warn!(
                "No report found for {name}; retrying with {verbosity} output (attempt {} of {})",
                index + 2,
                retry.max_attempts()
            );
            outcome = self.attempt(path, verbosity);
            if outcome.is_ok() {
                info!("Recovered report for {name} on attempt {}", index + 2);
            }
        }

        outcome
    }

    fn attempt(&self, path: &Path, verbosity: ToolVerbosity) -> Result<FileReport, FileFailure> {
        let output = invoke(&self.tool, path, verbosity, self.settings.timeout)?;
        Ok(scrape(&self.locator, &output.combined())?)
    }
}

/// Enumerate, process, and write the table described by `settings`.
pub fn run(settings: &RunSettings) -> Result<RunOutcome> {
    settings.validate().context("Invalid settings")?;

    let files = pliptab_walk::list_structure_files(&settings.folder, &settings.extension)?;
    if files.is_empty() {
        bail!(
            "No structure files (*.{}) found in {}",
            settings.extension.trim_start_matches('.'),
            settings.folder.display()
        );
    }
    info!(count = files.len(), folder = %settings.folder.display(), "found structure files");

    let progress = FileProgress::new(settings.progress, files.len() as u64);
    let (table, summary) = Pipeline::new(settings).collect(&files, &progress);
    progress.finish_and_clear();

    if summary.retries > 0 {
        warn!("Tool was rerun {} time(s) after output without a report", summary.retries);
    }

    if table.is_empty() {
        bail!(
            "No valid PLIP output processed ({} of {} files skipped: {})",
            summary.skipped.len(),
            summary.discovered,
            summary.describe_failures()
        );
    }

    pliptab_format::write_table(&settings.output, &table, settings.order)?;

    Ok(RunOutcome {
        table,
        summary,
        output: settings.output.clone(),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_skip(name: &str, failure: &FileFailure) {
    match failure {
        FileFailure::Tool(err) => {
            warn!("Error running PLIP on {name}: {err}. Skipping this file.");
        }
        FileFailure::Report(ReportError::Extract(err)) => {
            warn!(
                "{err} for {name}. Here is a preview:\n{}\nSkipping this file.",
                err.preview()
            );
        }
        FileFailure::Report(ReportError::Parse(err)) => {
            warn!("Error parsing XML for {name}: {err}. Skipping this file.");
        }
        FileFailure::Report(ReportError::Tally(err)) => {
            warn!("{err} for {name}. Skipping this file.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pliptab_report::ExtractError;

    fn extract_failure() -> FileFailure {
        FileFailure::Report(ReportError::Extract(ExtractError::MissingOpen {
            marker: "<report>".into(),
            preview: String::new(),
        }))
    }

    #[test]
    fn failure_kinds_follow_the_taxonomy() {
        assert_eq!(extract_failure().kind(), FailureKind::Extraction);
        assert_eq!(
            FileFailure::Report(ReportError::Tally(TallyError::MissingInteractions)).kind(),
            FailureKind::MissingInteractions
        );
        let parse = pliptab_report::parse("<report>").unwrap_err();
        assert_eq!(
            FileFailure::Report(ReportError::Parse(parse)).kind(),
            FailureKind::Parse
        );
    }

    #[test]
    fn summary_counts_by_kind() {
        let summary = RunSummary {
            discovered: 4,
            skipped: vec![
                SkippedFile {
                    file: "a.pdb".into(),
                    failure: extract_failure(),
                },
                SkippedFile {
                    file: "b.pdb".into(),
                    failure: extract_failure(),
                },
            ],
            retries: 1,
        };
        assert_eq!(summary.processed(), 2);
        assert_eq!(summary.failure_counts()[&FailureKind::Extraction], 2);
        assert_eq!(summary.describe_failures(), "2 no report in output");
    }

    #[test]
    fn file_label_is_the_file_name() {
        assert_eq!(file_label(Path::new("/data/run1/A.pdb")), "A.pdb");
    }
}
