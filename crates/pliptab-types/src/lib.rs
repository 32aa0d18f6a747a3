//! # pliptab-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures shared by every `pliptab`
//! stage: the fixed catalog of interaction categories, the per-file count
//! report, and the aggregate table the writer consumes.
//!
//! ## What belongs here
//! * Pure data types (categories, reports, tables)
//! * Enums shared with the CLI (column order, tool verbosity)
//!
//! ## What does NOT belong here
//! * File I/O
//! * Process spawning
//! * XML parsing

use std::collections::BTreeMap;
use std::fmt;

/// Number of interaction categories every report carries.
pub const CATEGORY_COUNT: usize = 8;

/// Header label of the first column in the output table.
pub const CATEGORY_COLUMN_LABEL: &str = "Interaction Type";

/// One of the eight interaction classes PLIP reports.
///
/// Declaration order is the row order of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InteractionCategory {
    HydrophobicInteractions,
    HydrogenBonds,
    SaltBridges,
    PiCationInteractions,
    WaterBridges,
    PiStacks,
    HalogenBonds,
    MetalComplexes,
}

impl InteractionCategory {
    /// All categories, in table row order.
    pub const ALL: [InteractionCategory; CATEGORY_COUNT] = [
        InteractionCategory::HydrophobicInteractions,
        InteractionCategory::HydrogenBonds,
        InteractionCategory::SaltBridges,
        InteractionCategory::PiCationInteractions,
        InteractionCategory::WaterBridges,
        InteractionCategory::PiStacks,
        InteractionCategory::HalogenBonds,
        InteractionCategory::MetalComplexes,
    ];

    /// Tag of the container element under `<interactions>`.
    pub fn container_tag(self) -> &'static str {
        match self {
            InteractionCategory::HydrophobicInteractions => "hydrophobic_interactions",
            InteractionCategory::HydrogenBonds => "hydrogen_bonds",
            InteractionCategory::SaltBridges => "salt_bridges",
            InteractionCategory::PiCationInteractions => "pi_cation_interactions",
            InteractionCategory::WaterBridges => "water_bridges",
            InteractionCategory::PiStacks => "pi_stacks",
            InteractionCategory::HalogenBonds => "halogen_bonds",
            InteractionCategory::MetalComplexes => "metal_complexes",
        }
    }

    /// Tag of the entries counted inside the container.
    ///
    /// `None` means every direct child of the container counts.
    pub fn entry_tag(self) -> Option<&'static str> {
        match self {
            InteractionCategory::HydrophobicInteractions => Some("hydrophobic_interaction"),
            InteractionCategory::HydrogenBonds => Some("hydrogen_bond"),
            InteractionCategory::SaltBridges => Some("salt_bridge"),
            InteractionCategory::PiCationInteractions => Some("pi_cation_interaction"),
            InteractionCategory::WaterBridges => Some("water_bridge"),
            InteractionCategory::PiStacks => Some("pi_stack"),
            InteractionCategory::HalogenBonds => Some("halogen_bond"),
            InteractionCategory::MetalComplexes => None,
        }
    }

    /// Human-readable row label.
    pub fn display_name(self) -> &'static str {
        match self {
            InteractionCategory::HydrophobicInteractions => "Hydrophobic Interactions",
            InteractionCategory::HydrogenBonds => "Hydrogen Bonds",
            InteractionCategory::SaltBridges => "Salt Bridges",
            InteractionCategory::PiCationInteractions => "pi-Cation Interactions",
            InteractionCategory::WaterBridges => "Water Bridges",
            InteractionCategory::PiStacks => "Pi Stacks",
            InteractionCategory::HalogenBonds => "Halogen Bonds",
            InteractionCategory::MetalComplexes => "Metal Complexes",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.display_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for InteractionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Interaction counts for a single structure file.
///
/// Always carries one count per category; categories missing from the
/// tool's report are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileReport {
    counts: [u64; CATEGORY_COUNT],
}

impl FileReport {
    /// A zero-filled report.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: InteractionCategory, count: u64) {
        self.counts[category.index()] = count;
    }

    /// Builder-style [`FileReport::set`].
    pub fn with(mut self, category: InteractionCategory, count: u64) -> Self {
        self.set(category, count);
        self
    }

    pub fn get(&self, category: InteractionCategory) -> u64 {
        self.counts[category.index()]
    }

    /// Look up a count by row label, as the table writer does.
    pub fn get_by_display_name(&self, name: &str) -> Option<u64> {
        InteractionCategory::from_display_name(name).map(|c| self.get(c))
    }

    /// Sum across all categories.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(category, count)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (InteractionCategory, u64)> + '_ {
        InteractionCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Reports keyed by input file name, accumulated across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    reports: BTreeMap<String, FileReport>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished report. A later insert for the same name replaces
    /// the earlier one.
    pub fn insert(&mut self, file_name: impl Into<String>, report: FileReport) {
        self.reports.insert(file_name.into(), report);
    }

    pub fn get(&self, file_name: &str) -> Option<&FileReport> {
        self.reports.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// File names in ascending order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.reports.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileReport)> {
        self.reports.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// -----------------------------------------------------------------------------
// Enums shared with CLI
// -----------------------------------------------------------------------------

/// How the table writer orders file columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ColumnOrder {
    /// File name, ascending.
    Name,
    /// Total interaction count, descending (ties by file name).
    #[default]
    Total,
}

impl fmt::Display for ColumnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOrder::Name => f.write_str("name"),
            ColumnOrder::Total => f.write_str("total"),
        }
    }
}

/// Verbosity flag variant used for one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ToolVerbosity {
    /// Pass `-q` to the tool.
    Quiet,
    /// Run without `-q`.
    Verbose,
}

impl fmt::Display for ToolVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolVerbosity::Quiet => f.write_str("quiet"),
            ToolVerbosity::Verbose => f.write_str("verbose"),
        }
    }
}
