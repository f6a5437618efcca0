//! Streaming node emitter
//!
//! The output document is written front to back and never rewritten here:
//!
//! ```text
//! begin_document   {"version": ..., "nodes": [
//! open_container     {"uid": ..., "children": [
//! write_leaf           {...file node...},
//! close_container    ]}
//! finish           (nodes array left open for the finalizer)
//! DocumentFinalizer  , unlinked ] , "supertags": [...] , "summary": {...} }
//! ```
//!
//! Each scope remembers whether it already holds a child so the next
//! fragment knows whether it needs a separating comma.

use serde::Serialize;
use std::io::Write;
use tracing::trace;

use crate::error::{ConvertError, ConvertResult};
use crate::model::{ConversionSummary, SuperTag, TanaNode, TIF_VERSION};

#[derive(Debug, Default)]
struct Scope {
    has_children: bool,
}

/// Append-only writer for the `nodes` array
#[derive(Debug)]
pub struct NodeEmitter<W: Write> {
    out: W,
    /// scopes[0] is the top-level `nodes` array, the rest are open containers
    scopes: Vec<Scope>,
}

impl<W: Write> NodeEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scopes: Vec::new(),
        }
    }

    /// Write the prologue and open the top-level `nodes` array
    pub fn begin_document(&mut self) -> ConvertResult<()> {
        if !self.scopes.is_empty() {
            return Err(ConvertError::scope("document already started"));
        }
        write!(
            self.out,
            "{{\n  \"version\": {},\n  \"nodes\": [",
            serde_json::to_string(TIF_VERSION)?
        )?;
        self.scopes.push(Scope::default());
        Ok(())
    }

    /// Number of open containers
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// Start a container node whose children follow as separate fragments.
    ///
    /// `header` must not carry children of its own.
    pub fn open_container(&mut self, header: &TanaNode) -> ConvertResult<()> {
        if !header.children.is_empty() {
            return Err(ConvertError::scope(format!(
                "container header '{}' already has children",
                header.name
            )));
        }

        self.separator()?;
        let json = serde_json::to_string(header)?;
        // Reopen the serialized object to append the children array
        let body = json
            .strip_suffix('}')
            .ok_or_else(|| ConvertError::scope("container header is not a JSON object"))?;
        write!(self.out, "{body},\"children\":[")?;
        self.scopes.push(Scope::default());

        trace!(uid = %header.uid, depth = self.depth(), "opened container");
        Ok(())
    }

    /// Write one complete node into the innermost open scope
    pub fn write_leaf(&mut self, node: &TanaNode) -> ConvertResult<()> {
        self.separator()?;
        serde_json::to_writer(&mut self.out, node)?;
        Ok(())
    }

    /// Close the innermost container
    pub fn close_container(&mut self) -> ConvertResult<()> {
        if self.scopes.len() < 2 {
            return Err(ConvertError::scope("close without a matching open container"));
        }
        self.scopes.pop();
        self.out.write_all(b"]}")?;
        Ok(())
    }

    /// Check that every container was closed and hand back the flushed writer
    pub fn finish(mut self) -> ConvertResult<W> {
        if self.scopes.is_empty() {
            return Err(ConvertError::scope("document was never started"));
        }
        if self.depth() != 0 {
            return Err(ConvertError::scope(format!(
                "{} container(s) still open",
                self.depth()
            )));
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn separator(&mut self) -> ConvertResult<()> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| ConvertError::scope("no open scope; call begin_document first"))?;
        if scope.has_children {
            self.out.write_all(b",\n")?;
        } else {
            self.out.write_all(b"\n")?;
            scope.has_children = true;
        }
        Ok(())
    }
}

/// Appends everything that follows the streamed nodes, in the fixed order
/// unlinked subtree, end of `nodes`, `supertags`, `summary`.
pub struct DocumentFinalizer<W: Write> {
    out: W,
}

impl<W: Write> DocumentFinalizer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `nodes` already holds the vault root, so the unlinked subtree is
    /// always preceded by a comma. Nothing is written for it when absent.
    pub fn finish(
        mut self,
        unlinked: Option<&TanaNode>,
        supertags: &[SuperTag],
        summary: &ConversionSummary,
    ) -> ConvertResult<W> {
        if let Some(node) = unlinked {
            self.out.write_all(b",\n")?;
            serde_json::to_writer(&mut self.out, node)?;
        }

        self.out.write_all(b"\n  ]")?;

        if !supertags.is_empty() {
            self.attribute("supertags", &supertags)?;
        }
        self.attribute("summary", summary)?;

        self.out.write_all(b"\n}\n")?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn attribute<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> ConvertResult<()> {
        write!(self.out, ",\n  \"{name}\": ")?;
        serde_json::to_writer_pretty(&mut self.out, value)?;
        Ok(())
    }
}
