//! Pipeline phase trait.

use super::GenerationContext;
use crate::error::Result;

/// A phase in the generation pipeline.
///
/// Phases run in a fixed order and share one [`GenerationContext`]. A phase
/// that fails fatally returns an error and aborts the run; advisory findings
/// are recorded as diagnostics instead.
pub trait Phase {
    /// The phase name, used in diagnostics and logging.
    fn name(&self) -> &'static str;

    /// A human-readable description of what this phase does.
    fn description(&self) -> &'static str;

    /// Run this phase against the generation context.
    fn run(&self, ctx: &mut GenerationContext) -> Result<()>;
}
