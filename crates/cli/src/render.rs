//! Template rendering.
//!
//! A [`Renderer`] is built once per run from a template directory and owns
//! the Tera instance along with the filters templates rely on:
//!
//! - `args(add_type=true, prefix="")`: `"GLenum target, GLint * params"`
//! - `printf`: conversion specifiers for one argument or a list of them
//! - `unconst`: a type with every `const` token removed

use std::collections::HashMap;
use std::path::Path;

use glgen_core::{FormatSpecifier, RenderContext, normalize_const};
use serde::Deserialize;
use tera::{Context, Tera, Value};
use tracing::debug;

use crate::CliError;

/// Directory searched for templates when none is given.
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

/// Render service holding every loaded template.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load every file under `template_dir`. Template names are paths
    /// relative to that directory.
    ///
    /// Every file is parsed up front, so one file that is not a valid
    /// template fails the load for every template in the directory.
    pub fn from_dir(template_dir: &Path) -> Result<Self, CliError> {
        let pattern = template_dir.join("**").join("*");
        let tera = Tera::new(&pattern.to_string_lossy())?;
        debug!(
            template_dir = %template_dir.display(),
            templates = tera.get_template_names().count(),
            "Loaded templates."
        );
        Ok(Self::with_tera(tera))
    }

    /// Build from in-memory `(name, source)` pairs.
    pub fn from_sources<'a, I>(templates: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        Ok(Self::with_tera(tera))
    }

    fn with_tera(mut tera: Tera) -> Self {
        // generated C, never HTML
        tera.autoescape_on(vec![]);
        tera.register_filter("args", args_filter);
        tera.register_filter("printf", printf_filter);
        tera.register_filter("unconst", unconst_filter);
        Self { tera }
    }

    /// Render `template` with `context`. Trailing newlines are stripped.
    pub fn render(&self, template: &str, context: &RenderContext) -> Result<String, CliError> {
        let context = Context::from_serialize(context)?;
        let rendered = self.tera.render(template, &context)?;
        Ok(rendered.trim_end_matches('\n').to_string())
    }
}

/// The parts of an argument record the filters read.
#[derive(Debug, Deserialize)]
struct ArgView {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    name: String,
}

impl FormatSpecifier for ArgView {
    fn format_specifier(&self) -> String {
        self.ty.format_specifier()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(ArgView),
    Many(Vec<ArgView>),
}

fn arg_list(filter: &str, value: &Value) -> tera::Result<Vec<ArgView>> {
    serde_json::from_value(value.clone())
        .map_err(|err| tera::Error::msg(format!("`{filter}` expects a list of arguments: {err}")))
}

fn args_filter(value: &Value, params: &HashMap<String, Value>) -> tera::Result<Value> {
    let args = arg_list("args", value)?;
    let add_type = match params.get("add_type") {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(tera::Error::msg(format!(
                "`args`: add_type must be a boolean, got {other}"
            )));
        }
        None => true,
    };
    let prefix = match params.get("prefix") {
        Some(Value::String(prefix)) => prefix.as_str(),
        Some(other) => {
            return Err(tera::Error::msg(format!(
                "`args`: prefix must be a string, got {other}"
            )));
        }
        None => "",
    };

    let rendered = args
        .iter()
        .map(|arg| {
            if add_type {
                format!("{} {prefix}{}", arg.ty, arg.name)
            } else {
                format!("{prefix}{}", arg.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    Ok(Value::String(rendered))
}

fn printf_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let parsed: OneOrMany = serde_json::from_value(value.clone()).map_err(|err| {
        tera::Error::msg(format!(
            "`printf` expects an argument or a list of arguments: {err}"
        ))
    })?;
    let specifier = match parsed {
        OneOrMany::One(arg) => arg.format_specifier(),
        OneOrMany::Many(args) => args.format_specifier(),
    };
    Ok(Value::String(specifier))
}

fn unconst_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::String(ty) => Ok(Value::String(normalize_const(ty))),
        other => Err(tera::Error::msg(format!(
            "`unconst` expects a type string, got {other}"
        ))),
    }
}
