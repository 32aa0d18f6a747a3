//! Locating the report inside captured tool output.

use thiserror::Error;

/// Opening marker of PLIP's XML report.
pub const REPORT_OPEN: &str = "<report>";

/// Closing marker of PLIP's XML report.
pub const REPORT_CLOSE: &str = "</report>";

/// Number of characters of raw output shown when extraction fails.
pub const PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No {marker} marker found in tool output")]
    MissingOpen { marker: String, preview: String },

    #[error("No closing {marker} marker found after the report start")]
    MissingClose { marker: String, preview: String },
}

impl ExtractError {
    /// Leading slice of the raw output, for diagnostics.
    pub fn preview(&self) -> &str {
        match self {
            ExtractError::MissingOpen { preview, .. } | ExtractError::MissingClose { preview, .. } => {
                preview
            }
        }
    }
}

/// Finds the report text inside a tool's combined output.
pub trait ReportLocator {
    fn locate<'a>(&self, raw: &'a str) -> Result<&'a str, ExtractError>;
}

/// First opening marker through the last closing marker, inclusive.
///
/// Log noise before the first opening marker and after the last closing
/// marker is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    open: String,
    close: String,
}

impl MarkerPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for MarkerPair {
    fn default() -> Self {
        Self::new(REPORT_OPEN, REPORT_CLOSE)
    }
}

impl ReportLocator for MarkerPair {
    fn locate<'a>(&self, raw: &'a str) -> Result<&'a str, ExtractError> {
        let Some(start) = raw.find(&self.open) else {
            return Err(ExtractError::MissingOpen {
                marker: self.open.clone(),
                preview: preview(raw, PREVIEW_CHARS).to_string(),
            });
        };
        let end = raw
            .rfind(&self.close)
            .filter(|&end| end >= start + self.open.len());
        let Some(end) = end else {
            return Err(ExtractError::MissingClose {
                marker: self.close.clone(),
                preview: preview(raw, PREVIEW_CHARS).to_string(),
            });
        };
        Ok(&raw[start..end + self.close.len()])
    }
}

/// At most `max_chars` leading characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
