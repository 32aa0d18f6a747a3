//! Counting interaction entries in a parsed report.

use pliptab_types::{FileReport, InteractionCategory};
use thiserror::Error;

use crate::tree::Element;

/// Container of all category elements, nested under a binding site.
pub const INTERACTIONS_TAG: &str = "interactions";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TallyError {
    #[error("No <interactions> element found in report")]
    MissingInteractions,
}

/// Count every category under the first `<interactions>` element.
///
/// Categories whose container is absent count as zero. Only the first
/// `<interactions>` (document order) is read.
pub fn tally(root: &Element) -> Result<FileReport, TallyError> {
    let interactions = root
        .find_descendant(INTERACTIONS_TAG)
        .ok_or(TallyError::MissingInteractions)?;

    let mut report = FileReport::new();
    for category in InteractionCategory::ALL {
        report.set(category, count_category(interactions, category));
    }
    Ok(report)
}

fn count_category(interactions: &Element, category: InteractionCategory) -> u64 {
    let Some(container) = interactions.find_child(category.container_tag()) else {
        return 0;
    };
    let count = match category.entry_tag() {
        Some(tag) => container.count_children(tag),
        None => container.child_count(),
    };
    count as u64
}
