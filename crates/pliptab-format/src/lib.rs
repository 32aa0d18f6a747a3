//! # pliptab-format
//!
//! **Tier 3 (Formatting)**
//!
//! Renders the [`AggregateTable`] as a CSV pivot table: one row per
//! interaction category, one column per structure file.
//!
//! ## What belongs here
//! * Column ordering
//! * CSV serialization
//! * Output file writing
//!
//! ## What does NOT belong here
//! * Counting interactions (use pliptab-report)
//! * CLI arg parsing

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use pliptab_types::{AggregateTable, CATEGORY_COLUMN_LABEL, ColumnOrder, InteractionCategory};

/// File names in the order they appear as table columns.
pub fn order_columns(table: &AggregateTable, order: ColumnOrder) -> Vec<&str> {
    match order {
        ColumnOrder::Name => table.file_names().collect(),
        ColumnOrder::Total => {
            let mut ranked: Vec<(&str, u64)> = table
                .iter()
                .map(|(name, report)| (name, report.total()))
                .collect();
            // Ties fall back to file name so reruns produce the same bytes.
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            ranked.into_iter().map(|(name, _)| name).collect()
        }
    }
}

/// Write the table as CSV to `out`.
pub fn write_table_to<W: Write>(out: W, table: &AggregateTable, order: ColumnOrder) -> Result<()> {
    let columns = order_columns(table, order);
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    header.push(CATEGORY_COLUMN_LABEL);
    header.extend(columns.iter().copied());
    wtr.write_record(&header)?;

    for category in InteractionCategory::ALL {
        let mut row: Vec<String> = Vec::with_capacity(columns.len() + 1);
        row.push(category.display_name().to_string());
        for name in &columns {
            let count = table
                .get(name)
                .and_then(|r| r.get_by_display_name(category.display_name()))
                .unwrap_or(0);
            row.push(count.to_string());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the table to a string.
pub fn render_table(table: &AggregateTable, order: ColumnOrder) -> Result<String> {
    let mut buf = Vec::new();
    write_table_to(&mut buf, table, order)?;
    Ok(String::from_utf8(buf)?)
}

/// Create (or truncate) `path` and write the table to it.
pub fn write_table(path: &Path, table: &AggregateTable, order: ColumnOrder) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_table_to(&mut out, table, order)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
