//! Template rendering and the `##output` directive mini-language.
//!
//! Templates are compiled and evaluated fresh on every use; the engine is a
//! black box and only its rendered text matters here. The first line of the
//! rendered text may carry an output directive selecting a routing mode and
//! an optional explicit target path; without one, output defaults to
//! overwrite mode with a deterministically derived path.

use std::{
    fs,
    path::{Path, PathBuf},
};

use handlebars::Handlebars;
use metaforge_model::{MetaClass, MetaModel};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{Error, Result},
    options::GenOptions,
    output::OutputMode,
};

/// Directive prefix recognized on the first line of rendered output.
const DIRECTIVE_PREFIX: &str = "##output ";

/// The mutable mapping carried across every template evaluation within one
/// run: the model, the options, the current class (or null for project
/// templates), and any property-mode accumulator arrays.
#[derive(Debug, Clone)]
pub struct RenderContext {
    map: Map<String, Value>,
}

impl RenderContext {
    pub fn new(model: &MetaModel, options: &GenOptions) -> Result<Self> {
        let mut map = Map::new();
        map.insert("model".to_string(), serde_json::to_value(model)?);
        map.insert("options".to_string(), options.to_render_value());
        Ok(Self { map })
    }

    /// Set the current class entity; project templates pass `Value::Null`.
    pub fn set_class(&mut self, class: Value) {
        self.map.insert("class".to_string(), class);
    }

    /// Append a property-mode body to the array under `name`, creating the
    /// array on first use.
    pub fn push_property(&mut self, name: &str, body: &str) {
        let entry = self
            .map
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = entry {
            items.push(Value::String(body.to_string()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.map.insert(key.into(), value);
    }

    /// The value handed to the templating engine for one evaluation.
    pub fn to_value(&self) -> Value {
        Value::Object(self.map.clone())
    }
}

/// A rendered template body with its routing decision.
#[derive(Debug)]
pub struct Rendered {
    pub mode: OutputMode,
    pub path: PathBuf,
    pub body: String,
}

/// Render a template file against the current context and parse its output
/// directive.
///
/// `class` is the class the template is being rendered for, or `None` for a
/// project-level template; the caller is responsible for having set the
/// matching `class` entity in the context beforehand.
pub fn render_template_file(
    engine: &Handlebars<'_>,
    template: &Path,
    class: Option<&MetaClass>,
    ctx: &RenderContext,
    options: &GenOptions,
) -> Result<Rendered> {
    let source = fs::read_to_string(template)?;
    let raw = engine
        .render_template(&source, &ctx.to_value())
        .map_err(|source| Error::Template {
            template: template.to_path_buf(),
            source: Box::new(source),
        })?;

    let (directive, body) = split_directive(&raw);
    let (mode, explicit_path) = match directive {
        Some(line) => parse_directive(line, template)?,
        None => (OutputMode::Overwrite, None),
    };

    let path = match explicit_path {
        Some(p) => PathBuf::from(p),
        None => default_output_path(template, class, options),
    };

    debug!(
        template = %template.display(),
        %mode,
        output = %path.display(),
        "rendered template"
    );

    Ok(Rendered { mode, path, body })
}

/// Split the directive line (if any) from the rendered text. The directive
/// line and its trailing newline are stripped from the body.
fn split_directive(raw: &str) -> (Option<&str>, String) {
    if !raw.starts_with(DIRECTIVE_PREFIX) {
        return (None, raw.to_string());
    }
    match raw.find('\n') {
        Some(end) => (Some(raw[..end].trim_end()), raw[end + 1..].to_string()),
        None => (Some(raw.trim_end()), String::new()),
    }
}

/// Parse `##output <mode>` or `##output <mode> <path>`. The mode is
/// case-insensitive; anything outside the closed mode set is fatal.
fn parse_directive(line: &str, template: &Path) -> Result<(OutputMode, Option<String>)> {
    let mut words = line.split_whitespace().skip(1);
    let mode_word = words.next().unwrap_or_default();
    let mode = mode_word
        .parse::<OutputMode>()
        .map_err(|_| Error::UnknownOutputDirective {
            mode: mode_word.to_string(),
            template: template.to_path_buf(),
        })?;
    Ok((mode, words.next().map(str::to_string)))
}

/// Derive the default output path for a template with no directive path.
///
/// Class templates land at `<output>/<packageDirName>/<className><ext>`
/// where `ext` comes from [`default_extension`]; project templates land at
/// `<output>/<templateNameWithoutFinalExtension>`.
pub fn default_output_path(
    template: &Path,
    class: Option<&MetaClass>,
    options: &GenOptions,
) -> PathBuf {
    match class {
        Some(class) => {
            let mut path = options.output.clone();
            let package_dir = class.package_dir_name();
            if !package_dir.is_empty() {
                path.push(package_dir);
            }
            path.push(format!("{}{}", class.name, default_extension(template)));
            path
        }
        None => {
            let stem = template
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            options.output.join(stem)
        }
    }
}

/// The output extension encoded in a template's own file name: everything
/// from the first `.` to the last `.` (`Model.dao.js.hbs` → `.dao.js`).
/// Empty when the name has fewer than two dots.
pub fn default_extension(template: &Path) -> String {
    let Some(name) = template.file_name().map(|n| n.to_string_lossy()) else {
        return String::new();
    };
    match (name.find('.'), name.rfind('.')) {
        (Some(first), Some(last)) if last > first => name[first..last].to_string(),
        _ => String::new(),
    }
}
