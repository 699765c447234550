//! printf-style conversion specifiers for C-like types.
//!
//! Lookup rules, in order:
//! - any type containing `*` is printed as a pointer (`%p`);
//! - otherwise the exact type string is looked up in [`SPECIFIERS`];
//! - unknown types fall back to the pointer code.
//!
//! Codes without a `%` get one prepended, except `<inttypes.h>` macro
//! references such as `"PRIi64"`. Those are emitted untouched and the
//! template supplies the `%` (`"%" PRIi64` in the generated C).

use std::collections::HashMap;
use std::sync::LazyLock;

const POINTER_CODE: &str = "p";

/// Separator used when formatting a sequence of arguments.
pub const SPECIFIER_SEPARATOR: &str = ", ";

/// Conversion codes keyed by exact type spelling.
pub static SPECIFIERS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("GLbitfield", "d"),
        ("GLboolean", "d"),
        ("GLbyte", "c"),
        ("GLchar", "c"),
        ("GLclampd", "0.2f"),
        ("GLclampf", "0.2f"),
        ("GLclampx", "d"),
        ("GLdouble", "0.2f"),
        ("GLenum", "0x%04X"),
        ("GLfixed", "d"),
        ("GLfloat", "0.2f"),
        ("GLhalfNV", "d"),
        ("GLint", "d"),
        ("GLint64EXT", "\"PRIi64\""),
        ("GLintptr", "td"),
        ("GLintptrARB", "td"),
        ("GLhandleARB", "u"),
        ("GLshort", "d"),
        ("GLsizei", "d"),
        ("GLsizeiptr", "td"),
        ("GLsizeiptrARB", "td"),
        ("GLubyte", "c"),
        ("GLuint", "u"),
        ("GLuint64", "\"PRIu64\""),
        ("GLuint64EXT", "\"PRIu64\""),
        ("GLushort", "u"),
        ("GLvoid", "p"),
        ("GLvdpauSurfaceNV", "td"),
        ("bool", "d"),
        ("double", "lf"),
        ("float", "f"),
        ("int", "d"),
        ("long long", "ll"),
        ("long", "l"),
        ("unsigned int", "u"),
        ("unsigned long long", "llu"),
        ("unsigned long", "lu"),
        ("int8_t", "\"PRIi8\""),
        ("int16_t", "\"PRIi16\""),
        ("int32_t", "\"PRIi32\""),
        ("int64_t", "\"PRIi64\""),
        ("uint8_t", "\"PRIu8\""),
        ("uint16_t", "\"PRIu16\""),
        ("uint32_t", "\"PRIu32\""),
        ("uint64_t", "\"PRIu64\""),
        // X11 / GLX
        ("Bool", "d"),
        ("Colormap", "lu"),
        ("Font", "lu"),
        ("GLXDrawable", "d"),
        ("Pixmap", "lu"),
        ("Window", "lu"),
    ]
    .into_iter()
    .collect()
});

/// Things that can be printed with a printf conversion.
///
/// Implemented for type strings, for argument records, and for slices of
/// either, where the per-item specifiers are joined with
/// [`SPECIFIER_SEPARATOR`].
pub trait FormatSpecifier {
    /// The conversion specifier(s) for `self`.
    fn format_specifier(&self) -> String;
}

impl FormatSpecifier for str {
    fn format_specifier(&self) -> String {
        let code = if self.contains('*') {
            POINTER_CODE
        } else {
            SPECIFIERS.get(self).copied().unwrap_or(POINTER_CODE)
        };

        if code.contains('%') || is_macro_reference(code) {
            code.to_string()
        } else {
            format!("%{code}")
        }
    }
}

impl FormatSpecifier for String {
    fn format_specifier(&self) -> String {
        self.as_str().format_specifier()
    }
}

impl<T: FormatSpecifier> FormatSpecifier for [T] {
    fn format_specifier(&self) -> String {
        self.iter()
            .map(FormatSpecifier::format_specifier)
            .collect::<Vec<_>>()
            .join(SPECIFIER_SEPARATOR)
    }
}

/// Whether a code is a quoted `<inttypes.h>` macro such as `"PRIu64"`.
pub fn is_macro_reference(code: &str) -> bool {
    code.len() > 2 && code.starts_with('"') && code.ends_with('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_keeps_embedded_percent() {
        assert_eq!("GLenum".format_specifier(), "0x%04X");
    }

    #[test]
    fn test_pointer_types() {
        assert_eq!("char *".format_specifier(), "%p");
        assert_eq!("const GLint*".format_specifier(), "%p");
        // a pointer to a known scalar is still a pointer
        assert_eq!("GLfloat *".format_specifier(), "%p");
    }

    #[test]
    fn test_scalar_codes_get_percent() {
        assert_eq!("GLint".format_specifier(), "%d");
        assert_eq!("GLfloat".format_specifier(), "%0.2f");
        assert_eq!("unsigned long long".format_specifier(), "%llu");
        assert_eq!("Window".format_specifier(), "%lu");
    }

    #[test]
    fn test_unknown_type_falls_back_to_pointer() {
        assert_eq!("GLsync".format_specifier(), "%p");
        assert_eq!("const GLint".format_specifier(), "%p");
    }

    #[test]
    fn test_macro_references_are_not_prefixed() {
        assert_eq!("int64_t".format_specifier(), "\"PRIi64\"");
        assert_eq!("GLuint64".format_specifier(), "\"PRIu64\"");
        assert_eq!("uint8_t".format_specifier(), "\"PRIu8\"");
    }

    #[test]
    fn test_sequence_is_comma_joined() {
        let types = ["GLenum".to_string(), "GLint *".to_string()];
        assert_eq!(types.format_specifier(), "0x%04X, %p");
    }

    #[test]
    fn test_empty_sequence() {
        let types: [String; 0] = [];
        assert_eq!(types.format_specifier(), "");
    }

    #[test]
    fn test_is_macro_reference() {
        assert!(is_macro_reference("\"PRIi32\""));
        assert!(!is_macro_reference("d"));
        assert!(!is_macro_reference("\""));
        assert!(!is_macro_reference("0x%04X"));
    }
}
