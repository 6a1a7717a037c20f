//! Pipeline orchestrator.

use metaforge_model::MetaModel;
use tracing::{debug, info, warn};

use super::{
    Diagnostic, GenerationContext, Phase,
    phases::{
        FlushAggregatesPhase, LoadGlobalsPhase, LoadPlatformPhase, ProjectScriptsPhase,
        ProjectTemplatesPhase, ValidateModelPhase, WalkModelPhase,
    },
};
use crate::{error::Result, options::GenOptions, output::WrittenFile, plugin::Platform};

/// The generation pipeline orchestrator.
///
/// Runs the built-in phases in their fixed order against one
/// [`GenerationContext`]:
///
/// validate → load-globals → load-platform → walk → project-scripts →
/// project-templates → flush
///
/// Any phase error aborts the run; the context is dropped, which releases
/// every aggregate handle still open.
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            phases: vec![
                Box::new(ValidateModelPhase),
                Box::new(LoadGlobalsPhase),
                Box::new(LoadPlatformPhase),
                Box::new(WalkModelPhase),
                Box::new(ProjectScriptsPhase),
                Box::new(ProjectTemplatesPhase),
                Box::new(FlushAggregatesPhase),
            ],
        }
    }

    /// Run a full generation pass for a model on a platform.
    ///
    /// # Errors
    ///
    /// Returns an error on validation failure, an unknown output directive,
    /// a template or script failure, or any filesystem error. Nothing is
    /// retried; a fatal condition stops the run rather than producing
    /// partial output.
    pub fn run(
        &self,
        model: MetaModel,
        platform: Platform,
        options: GenOptions,
    ) -> Result<GenerationReport> {
        info!(platform = platform.name(), "starting code generation");
        let mut ctx = GenerationContext::new(model, platform, options)?;

        for phase in &self.phases {
            debug!(phase = phase.name(), "running phase");
            phase.run(&mut ctx)?;
        }

        if ctx.scripts_seen == 0 && ctx.templates_seen == 0 {
            warn!("no script or template files located, check platform spelling");
            ctx.add_diagnostic(Diagnostic::warning(
                "discover",
                "no scripts or templates were found for this run",
            ));
        }

        info!(files = ctx.router.written().len(), "generation complete");
        Ok(GenerationReport {
            written: ctx.router.take_written(),
            diagnostics: ctx.diagnostics,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a completed generation run.
#[derive(Debug)]
pub struct GenerationReport {
    /// Files written, in write order.
    pub written: Vec<WrittenFile>,
    /// Advisory findings collected during the run.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }
}

#[cfg(test)]
mod tests {
    use metaforge_model::parse_str;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_empty_platform_completes_with_warning() {
        let temp = TempDir::new().unwrap();
        let model = parse_str(
            r#"{ "name": "Shop", "classes": [ { "name": "Order", "stereotypes": ["Entity"] } ] }"#,
        )
        .unwrap();
        let options = GenOptions {
            platform: "javascript".into(),
            platforms_dir: temp.path().to_path_buf(),
            output: temp.path().join("gen"),
            ..Default::default()
        };

        let report = Pipeline::new()
            .run(model, Platform::new("javascript"), options)
            .unwrap();

        assert!(report.written.is_empty());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_validation_failure_aborts_before_output() {
        let temp = TempDir::new().unwrap();
        let model = parse_str(
            r#"{
                "name": "Shop",
                "classes": [
                    { "name": "Order", "stereotypes": ["Entity"] },
                    { "name": "Order", "stereotypes": ["Entity"] }
                ]
            }"#,
        )
        .unwrap();
        let options = GenOptions {
            platform: "javascript".into(),
            platforms_dir: temp.path().to_path_buf(),
            output: temp.path().join("gen"),
            ..Default::default()
        };

        let result = Pipeline::new().run(model, Platform::new("javascript"), options);
        assert!(result.is_err());
        assert!(!temp.path().join("gen").exists());
    }
}
