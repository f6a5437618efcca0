//! Depth-first vault traversal
//!
//! Entries are visited in file-name order so two runs over the same vault
//! produce the same node order. Directory exits are derived from the walk
//! depth: when an entry at depth `d` arrives, every open directory at depth
//! `>= d` has no further children.

use std::path::Path;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ConvertError, ConvertResult};

/// Callbacks driven by [`walk_vault`]
pub trait VaultVisitor {
    /// Called before any child of the directory
    fn enter_container(&mut self, path: &Path, timestamp: i64) -> ConvertResult<()>;

    /// Called after the last child of the directory
    fn exit_container(&mut self, path: &Path) -> ConvertResult<()>;

    /// Called once per non-directory entry
    fn visit_file(&mut self, path: &Path, timestamp: i64) -> ConvertResult<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub include_hidden: bool,
    pub follow_links: bool,
}

/// Counts of what the walk visited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub containers: usize,
    pub files: usize,
    pub max_depth: usize,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Walk `root`, calling `visitor` for every directory and file beneath it.
///
/// The root itself is the first container entered and the last one exited.
/// Any enumeration error or visitor error stops the walk.
pub fn walk_vault<V: VaultVisitor + ?Sized>(
    root: &Path,
    timestamp: i64,
    options: &WalkOptions,
    visitor: &mut V,
) -> ConvertResult<WalkStats> {
    let metadata = std::fs::metadata(root).map_err(|e| ConvertError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(ConvertError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let include_hidden = options.include_hidden;
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| e.depth() == 0 || include_hidden || !is_hidden(e));

    let mut stats = WalkStats::default();
    // Depths of the directories currently open
    let mut open: Vec<(usize, std::path::PathBuf)> = Vec::new();

    for entry in walker {
        let entry = entry?;
        let depth = entry.depth();

        while open.last().is_some_and(|(d, _)| *d >= depth) {
            if let Some((_, path)) = open.pop() {
                visitor.exit_container(&path)?;
            }
        }

        if depth > 0 && entry.path_is_symlink() && !options.follow_links {
            debug!(path = %entry.path().display(), "skipping symlink");
            continue;
        }

        if entry.file_type().is_dir() {
            trace!(path = %entry.path().display(), depth, "entering directory");
            visitor.enter_container(entry.path(), timestamp)?;
            open.push((depth, entry.into_path()));
            stats.containers += 1;
            stats.max_depth = stats.max_depth.max(depth);
        } else {
            visitor.visit_file(entry.path(), timestamp)?;
            stats.files += 1;
        }
    }

    while let Some((_, path)) = open.pop() {
        visitor.exit_container(&path)?;
    }

    debug!(
        containers = stats.containers,
        files = stats.files,
        max_depth = stats.max_depth,
        "vault walk complete"
    );
    Ok(stats)
}
