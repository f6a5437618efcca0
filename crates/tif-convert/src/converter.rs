//! Vault conversion entry point

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tif_parser::NoteParser;
use tracing::{debug, info};

use crate::context::ConversionContext;
use crate::emitter::{DocumentFinalizer, NodeEmitter};
use crate::error::{ConvertError, ConvertResult};
use crate::file_node::build_file_node;
use crate::heading_tracker::HeadingTracker;
use crate::model::{ConversionSummary, TanaNode};
use crate::post_process::post_process_file;
use crate::reference::escape_literal;
use crate::traversal::{walk_vault, VaultVisitor};
use crate::unlinked::UnlinkedNodeCollector;

/// Suffix appended to the vault path to form the output path
pub const TARGET_SUFFIX: &str = ".tif.json";

/// Drop trailing separators (`vault/` and `vault` name the same root)
fn normalize_root(vault: &Path) -> PathBuf {
    vault.components().collect()
}

/// Output path for a vault: `<vault>.tif.json` next to the vault directory
pub fn target_path_for(vault: impl AsRef<Path>) -> PathBuf {
    let mut target = normalize_root(vault.as_ref()).into_os_string();
    target.push(TARGET_SUFFIX);
    PathBuf::from(target)
}

fn vault_label(vault: &Path) -> String {
    vault
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| vault.display().to_string())
}

/// Delete output left by an earlier run; a missing file is not an error
async fn remove_stale_output(target: &Path) -> ConvertResult<()> {
    match tokio::fs::remove_file(target).await {
        Ok(()) => {
            debug!(path = %target.display(), "removed stale output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConvertError::io(target, e)),
    }
}

/// Streams one node per directory and note into the emitter
struct VaultConverter<'a, W: Write> {
    emitter: NodeEmitter<W>,
    context: &'a mut ConversionContext,
    tracker: &'a mut HeadingTracker,
    parser: NoteParser,
}

impl<W: Write> VaultVisitor for VaultConverter<'_, W> {
    fn enter_container(&mut self, path: &Path, timestamp: i64) -> ConvertResult<()> {
        let label = vault_label(path);
        let header = TanaNode::new(self.context.next_uid(), escape_literal(&label), timestamp);
        self.emitter.open_container(&header)?;
        self.context.summary.record_leaves(1);
        Ok(())
    }

    fn exit_container(&mut self, _path: &Path) -> ConvertResult<()> {
        self.emitter.close_container()
    }

    fn visit_file(&mut self, path: &Path, timestamp: i64) -> ConvertResult<()> {
        if !self.context.options.accepts(path) {
            debug!(path = %path.display(), "skipping non-note file");
            return Ok(());
        }

        let note = self
            .parser
            .parse_file(path)
            .map_err(|source| ConvertError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let node = build_file_node(&note, timestamp, self.context, self.tracker);
        self.emitter.write_leaf(&node)
    }
}

/// Convert the vault at `vault_path` into `<vault>.tif.json`.
///
/// `today` (ms since epoch) stamps every node's `createdAt`/`editedAt`.
/// On error the output file is left as-is and is not valid.
pub async fn convert_vault(
    vault_path: impl AsRef<Path>,
    today: i64,
    context: &mut ConversionContext,
) -> ConvertResult<ConversionSummary> {
    let vault = normalize_root(vault_path.as_ref());
    let target = target_path_for(&vault);
    let label = vault_label(&vault);

    remove_stale_output(&target).await?;
    info!(vault = %vault.display(), target = %target.display(), "converting vault");

    let file = File::create(&target).map_err(|e| ConvertError::io(&target, e))?;
    let mut emitter = NodeEmitter::new(BufWriter::new(file));
    emitter.begin_document()?;

    // Phase 1: traverse and emit
    let mut tracker = HeadingTracker::new();
    let walk_options = context.options.walk_options();
    let parser = context.options.parser();
    let mut visitor = VaultConverter {
        emitter,
        context: &mut *context,
        tracker: &mut tracker,
        parser,
    };
    let stats = walk_vault(&vault, today, &walk_options, &mut visitor)?;
    let writer = visitor.emitter.finish()?;
    writer
        .into_inner()
        .map_err(|e| ConvertError::io(&target, e.into_error()))?;

    context.summary.reclassify_vault_root();

    // Phase 2: resolve placeholders
    let mut unlinked = UnlinkedNodeCollector::new();
    let resolved = post_process_file(&target, &tracker, &mut unlinked, context.uids_mut()).await?;
    drop(tracker);

    let unlinked_root = unlinked.create_unlinked_nodes(&label, today, context);

    // Phase 3: close the document
    let file = OpenOptions::new()
        .append(true)
        .open(&target)
        .map_err(|e| ConvertError::io(&target, e))?;
    let writer = DocumentFinalizer::new(BufWriter::new(file)).finish(
        unlinked_root.as_ref(),
        &context.create_super_tag_objects(),
        &context.summary,
    )?;
    writer
        .into_inner()
        .map_err(|e| ConvertError::io(&target, e.into_error()))?;

    let summary = context.summary;
    info!(
        target = %target.display(),
        notes = stats.files,
        directories = stats.containers,
        total_nodes = summary.total_nodes,
        broken_refs = summary.broken_refs,
        resolved_refs = resolved.resolved,
        "conversion complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path_ignores_trailing_separator() {
        assert_eq!(target_path_for("notes/vault/"), PathBuf::from("notes/vault.tif.json"));
        assert_eq!(target_path_for("notes/vault"), PathBuf::from("notes/vault.tif.json"));
        assert_eq!(target_path_for("vault//"), PathBuf::from("vault.tif.json"));
    }

    #[test]
    fn test_vault_label() {
        assert_eq!(vault_label(Path::new("/home/me/My Vault")), "My Vault");
    }

    #[tokio::test]
    async fn test_remove_missing_output_is_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        remove_stale_output(&dir.path().join("none.tif.json"))
            .await
            .unwrap();
    }
}
