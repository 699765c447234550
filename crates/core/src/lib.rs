//! Signature parsing and classification for generated API wrappers.
//!
//! Input documents declare functions as lists of `"type name"` strings. This
//! crate turns them into typed records, groups functions by type signature
//! and assembles the [`RenderContext`] consumed by templates:
//!
//! ```text
//! documents -> source::merge -> record::partition -> RenderContext
//! ```

pub mod context;
pub mod decl;
pub mod dedup;
pub mod error;
pub mod format;
pub mod record;
pub mod source;

pub use context::{Guard, RenderContext};
pub use decl::{Declaration, normalize_const};
pub use dedup::{FormatEntry, SignatureDeduplicator};
pub use error::{GenError, Result};
pub use format::FormatSpecifier;
pub use record::{ArgumentSpec, FunctionSpec, Rejection};
pub use source::{CategoryFilter, Document, DocumentShape, ExclusionSet, SourceOptions};

/// Merge `documents` and assemble the render context in one step.
pub fn build_context(
    documents: &[Document],
    options: &SourceOptions,
    guard: Guard,
) -> Result<RenderContext> {
    let table = source::merge(documents, options)?;
    Ok(RenderContext::assemble(&table, guard))
}
