//! # pliptab-walk
//!
//! **Tier 2 (Utilities)**
//!
//! Lists the structure files of a single directory.
//!
//! ## What belongs here
//! * Directory listing (one level, no recursion)
//! * Case-insensitive extension matching
//!
//! ## What does NOT belong here
//! * Reading file contents
//! * Tool invocation (use pliptab-invoke)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use tracing::{debug, warn};

/// True when the file name ends with `.{extension}`, ignoring ASCII case.
///
/// `extension` may be given with or without its leading dot.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let suffix = format!(".{}", ext.to_ascii_lowercase());
    name.to_ascii_lowercase().ends_with(&suffix)
}

/// Direct children of `dir` that are regular files with the given extension,
/// sorted by file name.
///
/// Hidden files are listed and ignore files are not consulted: the folder is
/// taken exactly as the user laid it out. Symlinks are followed; an entry
/// that cannot be read (such as a dangling link) is logged and skipped. Only
/// an unreadable `dir` is an error.
pub fn list_structure_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Input path does not exist or is not a directory: {}", dir.display());
    }

    let mut builder = WalkBuilder::new(dir);
    builder.standard_filters(false);
    builder.max_depth(Some(1));
    builder.follow_links(true);

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth().is_some_and(|d| d > 0) => {
                warn!("Skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to list {}", dir.display()));
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.into_path();
        if has_extension(&path, extension) {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-structure file");
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
