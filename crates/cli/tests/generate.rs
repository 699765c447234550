//! End-to-end generation through `glgen_cli::generate`, with fixture
//! documents and templates written to a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use glgen_cli::{Cli, CliError, generate};
use glgen_core::GenError;
use tempfile::TempDir;

const LIST_TEMPLATE: &str = "\
{% for f in functions %}{{ f.name }}({{ f.args | printf }})
{% endfor %}--
{% for f in formats %}{{ f.name }} {% endfor %}
";

const GUARD_TEMPLATE: &str = "\
{% if ifdef %}#ifdef {{ ifdef }}
{% endif %}#ifndef {{ name }}
{% for h in headers %}#include <{{ h }}>
{% endfor %}#endif
{% if ifdef %}#endif
{% endif %}
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();
        let fixture = Self { dir };
        fixture.template("list.txt", LIST_TEMPLATE);
        fixture.template("guard.h", GUARD_TEMPLATE);
        fixture
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn template(&self, name: &str, content: &str) {
        fs::write(self.template_dir().join(name), content).unwrap();
    }

    fn template_dir(&self) -> PathBuf {
        self.dir.path().join("templates")
    }

    fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let template_dir = self.template_dir();
        let mut argv = vec![
            "glgen".to_string(),
            "--template-dir".to_string(),
            template_dir.display().to_string(),
        ];
        argv.extend(args.iter().map(|s| (*s).to_string()));
        let cli = Cli::try_parse_from(argv).unwrap();
        generate(&cli)
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

const GL: &str = r#"
glBindTexture: [void, GLenum target, GLuint texture]
glGetIntegerv: [void, GLenum pname, GLint *params]
glGetBooleanv: [void, GLenum pname, GLboolean *params]
glGetFloatv: [void, GLenum pname, GLint *params]
glLoadMatrixf: [void, "const GLfloat m[16]"]
glFinish:
glGetError: [GLenum, void]
"#;

#[test]
fn test_flat_document() {
    let fx = Fixture::new();
    let gl = fx.file("gl.yml", GL);

    let out = fx.run(&[&path_str(&gl), "list.txt", "GL"]).unwrap();
    assert_eq!(
        out,
        "glBindTexture(0x%04X, %u)\n\
         glFinish()\n\
         glGetBooleanv(0x%04X, %p)\n\
         glGetError()\n\
         glGetFloatv(0x%04X, %p)\n\
         glGetIntegerv(0x%04X, %p)\n\
         --\n\
         glBindTexture glFinish glGetBooleanv glGetError glGetFloatv "
    );
}

#[test]
fn test_guard_headers_and_ifdef() {
    let fx = Fixture::new();
    let gl = fx.file("gl.yml", GL);

    let out = fx
        .run(&[
            &path_str(&gl),
            "guard.h",
            "GL_MOCK_H",
            "GL/gl.h",
            "stdio.h",
            "--ifdef=USE_MOCK",
        ])
        .unwrap();
    assert_eq!(
        out,
        "#ifdef USE_MOCK\n#ifndef GL_MOCK_H\n#include <GL/gl.h>\n#include <stdio.h>\n#endif\n#endif"
    );
}

#[test]
fn test_merge_overrides_and_skip() {
    let fx = Fixture::new();
    let first = fx.file("first.yml", GL);
    let second = fx.file(
        "second.yml",
        "glBindTexture: [void, GLenum target, GLint texture]\nglExtra: [void, GLfloat f]\n",
    );
    let skip = fx.file("skip.yml", "glGetError:\nglFinish: ignored\n");

    let documents = format!("{},{}", path_str(&first), path_str(&second));
    let out = fx
        .run(&[&documents, "list.txt", "GL", &format!("--skip={}", path_str(&skip))])
        .unwrap();
    assert_eq!(
        out,
        "glBindTexture(0x%04X, %d)\n\
         glExtra(%0.2f)\n\
         glGetBooleanv(0x%04X, %p)\n\
         glGetFloatv(0x%04X, %p)\n\
         glGetIntegerv(0x%04X, %p)\n\
         --\n\
         glBindTexture glExtra glGetBooleanv glGetFloatv "
    );
}

#[test]
fn test_deep_documents_with_category_filter() {
    let fx = Fixture::new();
    let deep = fx.file(
        "deep.yml",
        "\
core:
  glClear: [void, GLbitfield mask]
ARB_sync:
  glDeleteSync: [void, GLsync sync]
EXT_foo:
  glFooEXT: [void, int64_t value]
",
    );

    let all = fx.run(&[&path_str(&deep), "list.txt", "GL", "--deep"]).unwrap();
    assert!(all.starts_with("glClear(%d)\nglDeleteSync(%p)\nglFooEXT(\"PRIi64\")\n--"));

    let filtered = fx
        .run(&[&path_str(&deep), "list.txt", "GL", "--deep", "--cats=core,EXT_foo"])
        .unwrap();
    assert_eq!(
        filtered,
        "glClear(%d)\nglFooEXT(\"PRIi64\")\n--\nglClear glFooEXT "
    );
}

#[test]
fn test_empty_document_contributes_nothing() {
    let fx = Fixture::new();
    let empty = fx.file("empty.yml", "");
    let gl = fx.file("gl.yml", "glFlush: [void]\n");

    let documents = format!("{},{}", path_str(&empty), path_str(&gl));
    let out = fx.run(&[&documents, "list.txt", "GL"]).unwrap();
    assert_eq!(out, "glFlush()\n--\nglFlush ");
}

#[test]
fn test_missing_document_is_fatal() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("missing.yml");

    let err = fx.run(&[&path_str(&missing), "list.txt", "GL"]).unwrap_err();
    assert!(matches!(err, CliError::Source(GenError::Read { .. })));
}

#[test]
fn test_malformed_skip_document_is_fatal() {
    let fx = Fixture::new();
    let gl = fx.file("gl.yml", GL);
    let skip = fx.file("skip.yml", "- glFinish\n");

    let err = fx
        .run(&[&path_str(&gl), "list.txt", "GL", &format!("--skip={}", path_str(&skip))])
        .unwrap_err();
    assert!(matches!(err, CliError::Source(GenError::Shape { .. })));
}

#[test]
fn test_unknown_template_is_fatal() {
    let fx = Fixture::new();
    let gl = fx.file("gl.yml", GL);

    let err = fx.run(&[&path_str(&gl), "nope.h", "GL"]).unwrap_err();
    assert!(matches!(err, CliError::Template(_)));
}

#[test]
fn test_repository_templates_render() {
    let fx = Fixture::new();
    let gl = fx.file("gl.yml", GL);
    let template_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../template");

    let cli = Cli::try_parse_from([
        "glgen".to_string(),
        path_str(&gl),
        "wrap.h".to_string(),
        "GL_WRAP".to_string(),
        "gl.h".to_string(),
        "--template-dir".to_string(),
        path_str(&template_dir),
    ])
    .unwrap();
    let out = generate(&cli).unwrap();
    assert!(out.contains("#ifndef GL_WRAP_H"));
    assert!(out.contains("#include \"gl.h\""));
    assert!(out.contains(
        "typedef void (*FORMAT_void_GLenum_GLint___PTR__)(GLenum pname, GLint * params);"
    ));
    assert!(out.contains("typedef void (*FORMAT_void)();"));
    assert!(out.contains("typedef GLenum (*FORMAT_GLenum)();"));
    assert!(!out.contains("(*void)"));
    assert!(!out.contains("(*GLenum)"));
    assert!(out.contains("GLenum glGetError();"));
    assert!(!out.contains("glLoadMatrixf"));
}

#[test]
fn test_repository_log_template_prefixes_macro_specifiers() {
    let fx = Fixture::new();
    let gl = fx.file(
        "gl.yml",
        "glFooEXT: [void, int64_t value]\nglGetError: [GLenum, void]\nglUniform1i: [void, GLint location, GLint v0]\n",
    );
    let template_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../template");

    let cli = Cli::try_parse_from([
        "glgen".to_string(),
        path_str(&gl),
        "log.c".to_string(),
        "GL_LOG".to_string(),
        "--template-dir".to_string(),
        path_str(&template_dir),
    ])
    .unwrap();
    let out = generate(&cli).unwrap();
    assert!(out.contains("void log_glFooEXT(int64_t value) {"));
    assert!(out.contains(r##"printf("glFooEXT(%"PRIi64");\n", value);"##));
    assert!(out.contains(r##"printf("glUniform1i(%d, %d);\n", location, v0);"##));
    assert!(out.contains(r##"printf("glGetError();\n");"##));
    assert!(out.contains("    GLenum ret = glGetError();"));
    assert!(!out.contains("%%"));
}

#[test]
fn test_deep_mixes_flat_and_nested_documents() {
    let fx = Fixture::new();
    let flat = fx.file("flat.yml", "glFlush: [void]\n");
    let deep = fx.file("deep.yml", "core:\n  glClear: [void, GLbitfield mask]\n");

    let documents = format!("{},{}", path_str(&flat), path_str(&deep));
    let out = fx.run(&[&documents, "list.txt", "GL", "--deep"]).unwrap();
    assert_eq!(out, "glClear(%d)\nglFlush()\n--\nglClear glFlush ");
}

#[test]
fn test_invalid_file_in_template_dir_is_fatal() {
    let fx = Fixture::new();
    fx.template("broken.txt", "{% if %}");
    let gl = fx.file("gl.yml", GL);

    let err = fx.run(&[&path_str(&gl), "list.txt", "GL"]).unwrap_err();
    assert!(matches!(err, CliError::Template(_)));
}
