//! FlushAggregates phase.

use crate::{
    error::Result,
    pipeline::{GenerationContext, Phase},
};

/// Phase that closes every open aggregate handle exactly once, regardless
/// of how many writes targeted it.
pub struct FlushAggregatesPhase;

impl Phase for FlushAggregatesPhase {
    fn name(&self) -> &'static str {
        "flush"
    }

    fn description(&self) -> &'static str {
        "Close aggregate output files"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        ctx.router.flush_aggregates()
    }
}
