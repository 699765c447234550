//! Command-line front end for glgen.
//!
//! Parses arguments, loads the declaration and exclusion documents, builds
//! the render context and renders one template to stdout.

pub mod render;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use glgen_core::{
    CategoryFilter, Document, DocumentShape, ExclusionSet, GenError, Guard, SourceOptions,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub use render::{DEFAULT_TEMPLATE_DIR, Renderer};

const LOG_ENV: &str = "GLGEN_LOG";
const LOGGED_CRATES: [&str; 3] = ["glgen", "glgen_cli", "glgen_core"];

/// Anything that ends a run without output.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A document could not be loaded or has the wrong shape.
    #[error(transparent)]
    Source(#[from] GenError),

    /// Template loading or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Writing the rendered output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Generate wrapper code from YAML declarations and a Tera template.
#[derive(Parser, Debug, Clone)]
#[command(name = "glgen", version, about = "Generate API wrapper code from YAML declarations")]
pub struct Cli {
    /// Comma-separated declaration documents, merged in order
    #[arg(value_name = "YAML")]
    pub documents: String,

    /// Template to render, relative to --template-dir
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Header guard name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Headers to include
    #[arg(value_name = "HEADERS")]
    pub headers: Vec<String>,

    /// Documents are nested as category -> function -> declarations
    #[arg(long)]
    pub deep: bool,

    /// Comma-separated categories to keep (with --deep)
    #[arg(long, value_delimiter = ',')]
    pub cats: Vec<String>,

    /// Wrap the output in #ifdef MACRO
    #[arg(long, value_name = "MACRO")]
    pub ifdef: Option<String>,

    /// Wrap the output in #ifndef MACRO
    #[arg(long, value_name = "MACRO")]
    pub ifndef: Option<String>,

    /// Document whose top-level keys name functions to leave out
    #[arg(long, value_name = "PATH")]
    pub skip: Option<PathBuf>,

    /// Directory templates are loaded from; every file under it must be a
    /// valid template
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEMPLATE_DIR)]
    pub template_dir: PathBuf,
}

impl Cli {
    /// Declaration document paths, empty entries dropped.
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.documents
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    fn source_options(&self) -> Result<SourceOptions, CliError> {
        let shape = if self.deep {
            DocumentShape::Nested
        } else {
            DocumentShape::Flat
        };

        let categories = CategoryFilter::only(self.cats.iter().map(|cat| cat.trim()));
        if categories.is_restricted() && shape == DocumentShape::Flat {
            warn!("--cats has no effect without --deep");
        }

        let exclusions = match &self.skip {
            Some(path) => ExclusionSet::load(path)?,
            None => ExclusionSet::default(),
        };

        Ok(SourceOptions {
            shape,
            categories,
            exclusions,
        })
    }

    fn guard(&self) -> Guard {
        Guard {
            name: self.name.clone(),
            headers: self.headers.clone(),
            ifdef: self.ifdef.clone(),
            ifndef: self.ifndef.clone(),
        }
    }
}

/// Run a full generation and return the rendered text.
///
/// Every document is read before anything is rendered; the first failure
/// aborts the run.
pub fn generate(cli: &Cli) -> Result<String, CliError> {
    let renderer = Renderer::from_dir(&cli.template_dir)?;
    generate_with(cli, &renderer)
}

/// Like [`generate`], with an already constructed render service.
pub fn generate_with(cli: &Cli, renderer: &Renderer) -> Result<String, CliError> {
    let mut documents = Vec::new();
    for path in cli.document_paths() {
        match Document::load(&path)? {
            Some(document) => documents.push(document),
            None => debug!(path = %path.display(), "Skipping empty document."),
        }
    }

    let options = cli.source_options()?;
    let context = glgen_core::build_context(&documents, &options, cli.guard())?;
    renderer.render(&cli.template, &context)
}

/// Entry point used by the binary; returns the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = err.exit_code();
            let _ = err.print();
            return code;
        }
    };

    match generate(&cli).and_then(|output| write_output(&output)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {}", error_chain(&err));
            1
        }
    }
}

fn write_output(output: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(())
}

/// `err` followed by each of its sources, separated by `: `.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Install the stderr tracing subscriber.
///
/// GLGEN_LOG takes a plain level ("trace", "debug", "info", "warn", "error"),
/// applied to the glgen crates, or a full filter spec like
/// "glgen_core=trace,glgen_cli=debug".
pub fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter("warn"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn crate_filter(level: &str) -> String {
    LOGGED_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
