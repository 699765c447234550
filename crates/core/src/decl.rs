//! Declaration strings and type strings.
//!
//! A declaration is a single string of the shape `<type tokens> <identifier>`,
//! e.g. `"const GLchar *name"`. The identifier is the maximal trailing run of
//! word characters; everything before it, trimmed, is the type. A pointer
//! marker written against the identifier therefore stays with the type:
//!
//! | declaration         | type        | name     |
//! |---------------------|-------------|----------|
//! | `GLint *params`     | `GLint *`   | `params` |
//! | `GLint* params`     | `GLint*`    | `params` |
//! | `const GLchar *s`   | `const GLchar *` | `s` |
//!
//! Strings that do not split this way parse to the [`UNKNOWN_TYPE`] sentinel.

/// Type assigned to declarations that have no separable type and name.
pub const UNKNOWN_TYPE: &str = "unknown";

const CONST_QUALIFIER: &str = "const";

/// One declaration split into type and identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Type tokens, pointer markers and qualifiers included.
    pub ty: String,
    /// Trailing identifier.
    pub name: String,
}

impl Declaration {
    /// Split `raw` into type and name.
    ///
    /// Never fails: malformed input yields `{ ty: "unknown", name: raw }`,
    /// which the record builder treats as a reason to drop the function.
    pub fn parse(raw: &str) -> Self {
        split(raw).unwrap_or_else(|| Self {
            ty: UNKNOWN_TYPE.to_string(),
            name: raw.to_string(),
        })
    }

    /// Whether this is the sentinel produced for malformed input.
    pub fn is_unknown(&self) -> bool {
        self.ty == UNKNOWN_TYPE
    }
}

fn split(raw: &str) -> Option<Declaration> {
    let trimmed = raw.trim_end();
    let name_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(idx, _)| idx)?;

    let (head, name) = trimmed.split_at(name_start);
    let ty = head.trim();
    if ty.is_empty() {
        return None;
    }

    Some(Declaration {
        ty: ty.to_string(),
        name: name.to_string(),
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Drop every `const` token from a type string.
///
/// Remaining tokens keep their order and are joined by single spaces, so the
/// result can declare a writable local of the same type.
pub fn normalize_const(ty: &str) -> String {
    ty.split_whitespace()
        .filter(|token| *token != CONST_QUALIFIER)
        .collect::<Vec<_>>()
        .join(" ")
}
