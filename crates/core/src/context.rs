//! The render context handed to templates.
//!
//! Field names here are the contract with templates: `functions`, `formats`,
//! `headers`, `name`, `ifdef`, `ifndef`.

use serde::Serialize;
use tracing::debug;

use crate::dedup::{FormatEntry, SignatureDeduplicator};
use crate::record::{FunctionSpec, partition};
use crate::source::FunctionTable;

/// Output-level settings that are not derived from the documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guard {
    /// Header guard name.
    pub name: String,
    /// Headers to include, verbatim.
    pub headers: Vec<String>,
    /// Wrap the output in `#ifdef <macro>`.
    pub ifdef: Option<String>,
    /// Wrap the output in `#ifndef <macro>`.
    pub ifndef: Option<String>,
}

/// Everything a template can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    /// Accepted functions, ascending by name.
    pub functions: Vec<FunctionSpec>,
    /// One representative per signature, in first-seen order.
    pub formats: Vec<FormatEntry>,
    /// Headers to include.
    pub headers: Vec<String>,
    /// Header guard name.
    pub name: String,
    /// Optional `#ifdef` wrapper macro.
    pub ifdef: Option<String>,
    /// Optional `#ifndef` wrapper macro.
    pub ifndef: Option<String>,
}

impl RenderContext {
    /// Build records for every merged function and assemble the context.
    ///
    /// Functions that fail to build are dropped before signatures are
    /// considered, so they appear in neither `functions` nor `formats`.
    pub fn assemble(table: &FunctionTable, guard: Guard) -> Self {
        let built = partition(table);
        debug!(
            accepted = built.accepted.len(),
            rejected = built.rejected.len(),
            "Built function records."
        );
        Self::from_functions(built.accepted, guard)
    }

    /// Assemble from already built records.
    pub fn from_functions(mut functions: Vec<FunctionSpec>, guard: Guard) -> Self {
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        functions.dedup_by(|later, earlier| later.name == earlier.name);

        let mut dedup = SignatureDeduplicator::new();
        for function in &functions {
            dedup.observe(function);
        }
        debug!(
            functions = functions.len(),
            formats = dedup.len(),
            "Assembled render context."
        );

        Self {
            functions,
            formats: dedup.into_formats(),
            headers: guard.headers,
            name: guard.name,
            ifdef: guard.ifdef,
            ifndef: guard.ifndef,
        }
    }
}
