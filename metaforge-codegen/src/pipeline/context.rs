//! Shared state threaded through pipeline phases.

use handlebars::Handlebars;
use metaforge_model::MetaModel;

use super::diagnostic::{Diagnostic, Severity};
use crate::{
    error::Result,
    mixin::MixinRegistry,
    options::GenOptions,
    output::OutputRouter,
    paths::PathResolver,
    plugin::Platform,
    render::RenderContext,
    scripts::ScriptRunner,
};

/// Context passed through all pipeline phases.
///
/// Owns every long-lived resource of one generation run: the templating
/// engine, the mixin registry, the script execution records, the output
/// router (and with it the aggregate handle table), and the shared render
/// context. Dropping the context on an aborted run releases any aggregate
/// handles still open.
pub struct GenerationContext {
    /// The model being generated from. Read-only.
    pub model: MetaModel,
    /// Options for this run.
    pub options: GenOptions,
    /// The selected platform's script and helper registrations.
    pub platform: Platform,
    /// The templating engine, with helpers and partials registered by the
    /// load phases.
    pub engine: Handlebars<'static>,
    /// Mixin capability table populated by platform scripts.
    pub mixins: MixinRegistry,
    /// Stereotype-aware directory resolution for the platform tree.
    pub resolver: PathResolver,
    /// Once-per-identity script execution records.
    pub runner: ScriptRunner,
    /// All filesystem mutation goes through here.
    pub router: OutputRouter,
    /// The render context shared by every template evaluation.
    pub render: RenderContext,
    /// Advisory findings collected along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Plugin scripts encountered during the run.
    pub scripts_seen: usize,
    /// Templates encountered during the run.
    pub templates_seen: usize,
}

impl GenerationContext {
    pub fn new(model: MetaModel, platform: Platform, options: GenOptions) -> Result<Self> {
        let resolver = PathResolver::new(options.platform_dir());
        let render = RenderContext::new(&model, &options)?;
        Ok(Self {
            model,
            options,
            platform,
            engine: Handlebars::new(),
            mixins: MixinRegistry::new(),
            resolver,
            runner: ScriptRunner::new(),
            router: OutputRouter::new(),
            render,
            diagnostics: Vec::new(),
            scripts_seen: 0,
            templates_seen: 0,
        })
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Count the number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    /// Check if any warning diagnostics have been recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics at or above warning severity.
    pub fn problems(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| !matches!(d.severity, Severity::Info))
    }
}
