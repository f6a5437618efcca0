//! Reference resolution pass
//!
//! Streams the written output line by line into a sibling `.tmp` file,
//! replacing every placeholder token with the uid of its target, then renames
//! the temp file over the original. Tokens never span lines and only token
//! text changes, so the document structure is untouched.

use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::heading_tracker::HeadingTracker;
use crate::reference::{contains_placeholder, rewrite_placeholders};
use crate::uid::UidSource;
use crate::unlinked::UnlinkedNodeCollector;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessStats {
    pub lines: usize,
    /// Placeholders replaced by a defined node's uid
    pub resolved: usize,
    /// Placeholders redirected to the unlinked subtree
    pub redirected: usize,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Resolve every placeholder in the file at `path`.
///
/// Misses are registered with `unlinked`, which hands out the fallback uid.
pub async fn post_process_file(
    path: &Path,
    tracker: &HeadingTracker,
    unlinked: &mut UnlinkedNodeCollector,
    uids: &mut dyn UidSource,
) -> ConvertResult<PostProcessStats> {
    let tmp = temp_path(path);
    let input = File::open(path)
        .await
        .map_err(|e| ConvertError::io(path, e))?;
    let output = File::create(&tmp)
        .await
        .map_err(|e| ConvertError::io(&tmp, e))?;

    let mut lines = BufReader::new(input).lines();
    let mut writer = BufWriter::new(output);
    let mut stats = PostProcessStats::default();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ConvertError::io(path, e))?
    {
        stats.lines += 1;

        if contains_placeholder(&line) {
            let rewritten = rewrite_placeholders(&line, |token| {
                match tracker.resolve(&token.document, token.heading.as_deref()) {
                    Some(uid) => {
                        stats.resolved += 1;
                        uid.to_string()
                    }
                    None => {
                        stats.redirected += 1;
                        unlinked.register(token, &mut *uids)
                    }
                }
            });
            writer.write_all(rewritten.as_bytes()).await?;
        } else {
            writer.write_all(line.as_bytes()).await?;
        }
        writer.write_all(b"\n").await?;
    }

    writer.shutdown().await?;
    drop(writer);

    fs::rename(&tmp, path)
        .await
        .map_err(|e| ConvertError::io(path, e))?;

    debug!(
        path = %path.display(),
        lines = stats.lines,
        resolved = stats.resolved,
        redirected = stats.redirected,
        "resolved reference placeholders"
    );
    Ok(stats)
}
