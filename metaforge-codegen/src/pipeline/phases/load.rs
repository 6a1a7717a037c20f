//! LoadGlobals and LoadPlatform phases.

use tracing::debug;

use crate::{
    error::Result,
    pipeline::{GenerationContext, Phase},
    plugin::{Hook, load_helpers, load_partials},
    scripts::ScriptContext,
};

/// Phase that loads helpers and partials shared by every platform.
///
/// Runs before [`LoadPlatformPhase`] so that platform definitions under the
/// same name take precedence.
pub struct LoadGlobalsPhase;

impl Phase for LoadGlobalsPhase {
    fn name(&self) -> &'static str {
        "load-globals"
    }

    fn description(&self) -> &'static str {
        "Register shared template helpers and partials"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let global_dir = ctx.options.global_dir();
        let helpers = load_helpers(&mut ctx.engine, &ctx.resolver, &global_dir)?;
        let partials = load_partials(&mut ctx.engine, &ctx.resolver, &global_dir)?;
        debug!(helpers, partials, "loaded global plugin definitions");
        Ok(())
    }
}

/// Phase that initializes the selected platform: runs project scripts'
/// platform hooks (which typically register mixins), then registers the
/// platform's own helpers and partials.
pub struct LoadPlatformPhase;

impl Phase for LoadPlatformPhase {
    fn name(&self) -> &'static str {
        "load-platform"
    }

    fn description(&self) -> &'static str {
        "Initialize platform scripts, helpers, and partials"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let platform_dir = ctx.options.platform_dir();

        let scripts = ctx.platform.project_scripts();
        ctx.scripts_seen += scripts.len();
        for script in scripts {
            if script.hooks().contains(&Hook::Platform) {
                let mut sctx = ScriptContext {
                    mixins: &mut ctx.mixins,
                    data: &mut ctx.render,
                    options: &ctx.options,
                };
                script.init_platform(&mut sctx)?;
            } else {
                debug!(script = script.name(), "script has no platform hook, skipping");
            }
        }

        ctx.platform.register_helpers(&mut ctx.engine);
        let helpers = load_helpers(&mut ctx.engine, &ctx.resolver, &platform_dir)?;
        let partials = load_partials(&mut ctx.engine, &ctx.resolver, &platform_dir)?;
        debug!(helpers, partials, "loaded platform plugin definitions");

        Ok(())
    }
}
