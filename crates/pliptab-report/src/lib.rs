//! # pliptab-report
//!
//! **Tier 1 (Report Scraping)**
//!
//! Turns the captured output of one PLIP run into a [`FileReport`]:
//! locate the embedded `<report>` block, parse it into an element tree, and
//! count entries per interaction category.
//!
//! ## What belongs here
//! * Report location strategies ([`extract`])
//! * XML to element tree ([`tree`])
//! * Category counting ([`tally`])
//!
//! ## What does NOT belong here
//! * Running the tool (use pliptab-invoke)
//! * Writing tables (use pliptab-format)

pub mod extract;
pub mod tally;
pub mod tree;

use thiserror::Error;
use tracing::trace;

pub use extract::{ExtractError, MarkerPair, ReportLocator};
pub use pliptab_types::FileReport;
pub use tally::{TallyError, tally};
pub use tree::{Element, ParseError, parse};

/// Why a file's output produced no report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to parse report XML: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Tally(#[from] TallyError),
}

impl ReportError {
    /// True when the output held no complete report at all, which is the
    /// case a rerun at a different verbosity can fix.
    pub fn is_missing_report(&self) -> bool {
        matches!(self, ReportError::Extract(_))
    }
}

/// Locate, parse, and tally a tool's combined output.
pub fn scrape<L: ReportLocator + ?Sized>(locator: &L, raw: &str) -> Result<FileReport, ReportError> {
    let text = locator.locate(raw)?;
    trace!(bytes = text.len(), "located report");
    let root = parse(text)?;
    Ok(tally(&root)?)
}
