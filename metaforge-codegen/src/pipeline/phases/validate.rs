//! ValidateModel phase - semantic validation before any output.

use metaforge_model::IssueSeverity;

use crate::{
    error::{Error, Result},
    pipeline::{Diagnostic, GenerationContext, Phase},
};

/// Phase that validates the model and aborts the run on any error finding.
/// Runs first, so a failing model never produces partial output.
pub struct ValidateModelPhase;

impl Phase for ValidateModelPhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Check model integrity and collect diagnostics"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        for issue in metaforge_model::validate(&ctx.model) {
            let diagnostic = match issue.severity {
                IssueSeverity::Error => Diagnostic::error(self.name(), issue.message),
                IssueSeverity::Warning => Diagnostic::warning(self.name(), issue.message),
            };
            let diagnostic = match issue.location {
                Some(location) => diagnostic.at(location),
                None => diagnostic,
            };
            ctx.add_diagnostic(diagnostic);
        }

        if ctx.has_errors() {
            return Err(Error::Validation {
                errors: ctx.error_count(),
            });
        }

        Ok(())
    }
}
