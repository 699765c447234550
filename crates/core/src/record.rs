//! Function records built from raw declaration lists.
//!
//! A declaration list is `[return, arg...]`. An empty list means a `void`
//! function with no arguments, and a lone `void` after the return type means
//! "no arguments" rather than an argument named `void`.

use serde::Serialize;
use tracing::debug;

use crate::decl::{Declaration, UNKNOWN_TYPE};
use crate::format::FormatSpecifier;

/// Return type of a function with an empty declaration list.
pub const VOID: &str = "void";

/// Stand-in for `*` inside signature keys.
pub const POINTER_TOKEN: &str = "__PTR__";

/// One parsed argument of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSpec {
    /// Argument type, qualifiers and pointer markers included.
    #[serde(rename = "type")]
    pub ty: String,
    /// Argument name.
    pub name: String,
    /// 0-based position among the arguments.
    pub index: usize,
    /// Set on the first argument only.
    pub first: bool,
    /// Set on the last argument only.
    pub last: bool,
    /// printf conversion for this argument.
    pub specifier: String,
}

impl FormatSpecifier for ArgumentSpec {
    fn format_specifier(&self) -> String {
        self.ty.format_specifier()
    }
}

/// A fully parsed function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSpec {
    /// Function name, unique in a generated set.
    pub name: String,
    /// Return type.
    #[serde(rename = "return")]
    pub return_type: String,
    /// Arguments in declared order.
    pub args: Vec<ArgumentSpec>,
    /// Canonical key over the return and argument types.
    pub signature: String,
    /// Whether the return type is `void`.
    #[serde(rename = "isVoid")]
    pub is_void: bool,
}

/// Why a function was left out of the generated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The return type is empty or the `unknown` sentinel.
    #[error("unusable return type {0:?}")]
    ReturnType(String),

    /// An argument did not split into type and name.
    ///
    /// `void` only means "no arguments" as the sole entry after the return
    /// type. Anywhere else it is an argument without a name and lands here,
    /// unlike generators that drop every literal `void` entry.
    #[error("argument {index} ({raw:?}) has no separable type and name")]
    Argument {
        /// Position of the argument in the declaration list, return excluded.
        index: usize,
        /// The declaration as written.
        raw: String,
    },
}

impl FunctionSpec {
    /// Build a record from a function name and its declaration list.
    pub fn build(name: &str, declarations: &[String]) -> Result<Self, Rejection> {
        let (return_type, rest) = match declarations.split_first() {
            Some((ret, rest)) => (ret.trim(), rest),
            None => (VOID, declarations),
        };
        if return_type.is_empty() || return_type == UNKNOWN_TYPE {
            return Err(Rejection::ReturnType(return_type.to_string()));
        }

        let rest = match rest {
            [only] if only.trim() == VOID => &rest[..0],
            _ => rest,
        };

        let count = rest.len();
        let mut args = Vec::with_capacity(count);
        for (index, raw) in rest.iter().enumerate() {
            let decl = Declaration::parse(raw);
            if decl.is_unknown() {
                return Err(Rejection::Argument {
                    index,
                    raw: raw.clone(),
                });
            }
            let specifier = decl.ty.format_specifier();
            args.push(ArgumentSpec {
                ty: decl.ty,
                name: decl.name,
                index,
                first: index == 0,
                last: index + 1 == count,
                specifier,
            });
        }

        let signature = signature_key(
            return_type,
            args.iter().map(|arg| arg.ty.as_str()),
        );

        Ok(Self {
            name: name.to_string(),
            return_type: return_type.to_string(),
            is_void: return_type == VOID,
            args,
            signature,
        })
    }

    /// Argument types in declared order.
    pub fn arg_types(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.ty.as_str())
    }
}

/// Canonical key for a `(return, arg types...)` tuple.
///
/// Whitespace runs inside a type become `_`, every `*` becomes
/// [`POINTER_TOKEN`], and the pieces are joined with `_` in order.
pub fn signature_key<'a>(
    return_type: &'a str,
    arg_types: impl IntoIterator<Item = &'a str>,
) -> String {
    std::iter::once(return_type)
        .chain(arg_types)
        .map(|ty| {
            ty.split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .replace('*', POINTER_TOKEN)
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Outcome of building a batch of functions.
#[derive(Debug, Default)]
pub struct Partition {
    /// Functions that built cleanly, in input order.
    pub accepted: Vec<FunctionSpec>,
    /// Names of dropped functions with the reason.
    pub rejected: Vec<(String, Rejection)>,
}

/// Build every entry and split the results into accepted and rejected.
///
/// Rejected functions are left out of the output: a declaration
/// the parser cannot split marks a type the generator does not support.
pub fn partition<'a, I>(entries: I) -> Partition
where
    I: IntoIterator<Item = (&'a String, &'a Vec<String>)>,
{
    let mut out = Partition::default();
    for (name, declarations) in entries {
        match FunctionSpec::build(name, declarations) {
            Ok(spec) => out.accepted.push(spec),
            Err(reason) => {
                debug!(function = %name, %reason, "Skipping function.");
                out.rejected.push((name.clone(), reason));
            }
        }
    }
    out
}
