//! Streaming vault to Tana Intermediate Format conversion
//!
//! A conversion runs in two phases over one output file:
//!
//! 1. **Traverse and emit**: the vault is walked depth-first and every
//!    directory and note is appended to `<vault>.tif.json` as soon as it is
//!    seen. Links are written as placeholders because their targets may not
//!    have been visited yet.
//! 2. **Resolve and patch**: the file is rewritten line by line, replacing
//!    placeholders with the uids recorded by the [`HeadingTracker`]. Targets
//!    that were never defined are collected under an "Unlinked References"
//!    node appended with the tag registry and the summary.
//!
//! ```no_run
//! use tif_convert::{convert_vault, ConversionContext};
//!
//! # async fn run() -> tif_convert::ConvertResult<()> {
//! let mut context = ConversionContext::new();
//! let summary = convert_vault("notes/vault", 1_700_000_000_000, &mut context).await?;
//! println!("{} nodes", summary.total_nodes);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod converter;
pub mod emitter;
pub mod error;
pub mod file_node;
pub mod heading_tracker;
pub mod model;
pub mod post_process;
pub mod reference;
pub mod traversal;
pub mod uid;
pub mod unlinked;

pub use config::ConvertOptions;
pub use context::{ConversionContext, TagRegistry};
pub use converter::{convert_vault, target_path_for, TARGET_SUFFIX};
pub use emitter::{DocumentFinalizer, NodeEmitter};
pub use error::{ConvertError, ConvertResult};
pub use file_node::build_file_node;
pub use heading_tracker::{HeadingTracker, RefKey};
pub use model::{ConversionSummary, NodeType, SuperTag, TanaNode, TodoState, TIF_VERSION};
pub use post_process::{post_process_file, PostProcessStats};
pub use reference::ReferenceToken;
pub use traversal::{walk_vault, VaultVisitor, WalkOptions, WalkStats};
pub use uid::{RandomUids, SequentialUids, UidSource};
pub use unlinked::UnlinkedNodeCollector;
