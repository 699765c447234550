//! Loading and merging declaration documents.
//!
//! Documents come in two shapes:
//! - flat: `function -> [return, arg...]`
//! - nested: `category -> function -> [return, arg...]`
//!
//! The caller picks the shape up front; every document is flattened into a
//! single name-keyed table before any record is built.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

use crate::error::{GenError, Result};

/// Raw declaration list of one function.
pub type Declarations = Vec<String>;

/// Merged functions keyed (and therefore ordered) by name.
pub type FunctionTable = BTreeMap<String, Declarations>;

/// How the top level of each input document is organized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentShape {
    /// Function names map directly to declaration lists.
    #[default]
    Flat,
    /// Category labels map to flat function mappings. A document whose
    /// first value is a declaration list is still read as flat.
    Nested,
}

/// Restricts nested documents to a set of category labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    labels: Option<BTreeSet<String>>,
}

impl CategoryFilter {
    /// Accept every category.
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only the given labels. Empty labels are ignored; if none remain
    /// the filter accepts everything.
    pub fn only<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: BTreeSet<String> = labels
            .into_iter()
            .map(Into::into)
            .filter(|label: &String| !label.is_empty())
            .collect();
        Self {
            labels: (!labels.is_empty()).then_some(labels),
        }
    }

    /// Whether `label` passes the filter (exact match).
    pub fn accepts(&self, label: &str) -> bool {
        self.labels
            .as_ref()
            .is_none_or(|labels| labels.contains(label))
    }

    /// Whether any restriction is active.
    pub fn is_restricted(&self) -> bool {
        self.labels.is_some()
    }
}

/// Function names dropped regardless of which document declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Build from explicit names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Read an exclusion document. Its top-level keys are the names; values
    /// are ignored. An empty document excludes nothing.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    /// Parse exclusion document text.
    pub fn parse(origin: &str, text: &str) -> Result<Self> {
        let Some(mapping) = parse_mapping(origin, text)? else {
            return Ok(Self::default());
        };
        let names = mapping
            .iter()
            .map(|(key, _)| key_string(origin, key, "function name"))
            .collect::<Result<BTreeSet<_>>>()?;
        debug!(origin, count = names.len(), "Loaded exclusion list.");
        Ok(Self { names })
    }

    /// Whether `name` is excluded.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of excluded names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One parsed input document.
#[derive(Debug, Clone)]
pub struct Document {
    origin: String,
    root: Mapping,
}

impl Document {
    /// Read and parse a document. Returns `None` for an empty or `null`
    /// document, which contributes nothing.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = read(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    /// Parse document text; `origin` names it in errors.
    pub fn parse(origin: &str, text: &str) -> Result<Option<Self>> {
        Ok(parse_mapping(origin, text)?.map(|root| Self {
            origin: origin.to_string(),
            root,
        }))
    }

    /// Where the document came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Shape of this document under the requested mode.
    ///
    /// Nested mode is decided per document: when the first value is a
    /// declaration list (or `null`), the document is flat and read as such.
    pub fn shape(&self, requested: DocumentShape) -> DocumentShape {
        match (requested, self.root.iter().next()) {
            (DocumentShape::Nested, Some((_, Value::Sequence(_) | Value::Null))) => {
                DocumentShape::Flat
            }
            _ => requested,
        }
    }

    /// Flatten into `(name, declarations)` pairs in document order.
    pub fn functions(
        &self,
        shape: DocumentShape,
        categories: &CategoryFilter,
    ) -> Result<Vec<(String, Declarations)>> {
        let effective = self.shape(shape);
        if effective != shape {
            debug!(origin = %self.origin, "Reading flat document in nested mode.");
        }
        match effective {
            DocumentShape::Flat => flat_functions(&self.origin, &self.root),
            DocumentShape::Nested => {
                let mut out = Vec::new();
                for (key, value) in &self.root {
                    let category = key_string(&self.origin, key, "category label")?;
                    if !categories.accepts(&category) {
                        trace!(origin = %self.origin, %category, "Category filtered out.");
                        continue;
                    }
                    let Value::Mapping(functions) = value else {
                        return Err(GenError::shape(
                            &self.origin,
                            format!("category {category:?} is not a mapping of functions"),
                        ));
                    };
                    out.extend(flat_functions(&self.origin, functions)?);
                }
                Ok(out)
            }
        }
    }
}

/// Options controlling how documents are merged.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Top-level document shape.
    pub shape: DocumentShape,
    /// Categories kept in nested mode.
    pub categories: CategoryFilter,
    /// Names dropped from the merged table.
    pub exclusions: ExclusionSet,
}

/// Merge documents into one table.
///
/// Documents are applied in order; a name declared again by a later document
/// replaces the earlier declaration outright. Excluded names are removed last.
pub fn merge(documents: &[Document], options: &SourceOptions) -> Result<FunctionTable> {
    let mut table = FunctionTable::new();
    for document in documents {
        let functions = document.functions(options.shape, &options.categories)?;
        debug!(
            origin = document.origin(),
            count = functions.len(),
            "Merging document."
        );
        for (name, declarations) in functions {
            if table.insert(name.clone(), declarations).is_some() {
                trace!(function = %name, origin = document.origin(), "Overriding earlier declaration.");
            }
        }
    }
    table.retain(|name, _| !options.exclusions.contains(name));
    Ok(table)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| GenError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_mapping(origin: &str, text: &str) -> Result<Option<Mapping>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_yaml::from_str(text).map_err(|source| GenError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        _ => Err(GenError::shape(origin, "top level is not a mapping")),
    }
}

fn flat_functions(origin: &str, mapping: &Mapping) -> Result<Vec<(String, Declarations)>> {
    mapping
        .iter()
        .map(|(key, value)| {
            let name = key_string(origin, key, "function name")?;
            let declarations = declaration_list(origin, &name, value)?;
            Ok((name, declarations))
        })
        .collect()
}

fn declaration_list(origin: &str, name: &str, value: &Value) -> Result<Declarations> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::String(decl) => Ok(decl.clone()),
                other => Err(GenError::shape(
                    origin,
                    format!("{name}: declaration {other:?} is not a string"),
                )),
            })
            .collect(),
        _ => Err(GenError::shape(
            origin,
            format!("{name}: expected a list of declarations"),
        )),
    }
}

fn key_string(origin: &str, key: &Value, what: &str) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        other => Err(GenError::shape(
            origin,
            format!("{what} {other:?} is not a string"),
        )),
    }
}
