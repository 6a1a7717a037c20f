//! ProjectScripts and ProjectTemplates phases.

use serde_json::Value;
use tracing::debug;

use crate::{
    error::Result,
    pipeline::{GenerationContext, Phase},
    plugin::Hook,
    render::render_template_file,
    scripts::ScriptContext,
};

/// Phase that runs every project script's `init_project_templates` hook,
/// after all per-class processing and before project-level templates render.
pub struct ProjectScriptsPhase;

impl Phase for ProjectScriptsPhase {
    fn name(&self) -> &'static str {
        "project-scripts"
    }

    fn description(&self) -> &'static str {
        "Run project script hooks ahead of project templates"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        for script in ctx.platform.project_scripts() {
            if script.hooks().contains(&Hook::ProjectTemplates) {
                let mut sctx = ScriptContext {
                    mixins: &mut ctx.mixins,
                    data: &mut ctx.render,
                    options: &ctx.options,
                };
                script.init_project_templates(&mut sctx)?;
            } else {
                debug!(
                    script = script.name(),
                    "script has no project-templates hook, skipping"
                );
            }
        }
        Ok(())
    }
}

/// Phase that renders templates resolved with no stereotype (project-level),
/// with a null class in the render context.
pub struct ProjectTemplatesPhase;

impl Phase for ProjectTemplatesPhase {
    fn name(&self) -> &'static str {
        "project-templates"
    }

    fn description(&self) -> &'static str {
        "Render project-level templates"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let GenerationContext {
            options,
            engine,
            resolver,
            router,
            render,
            templates_seen,
            ..
        } = ctx;
        let platform_dir = options.platform_dir();

        let templates = resolver.resolve(&platform_dir, None, ".hbs");
        *templates_seen += templates.len();

        render.set_class(Value::Null);
        for template in &templates {
            let rendered = render_template_file(engine, template, None, render, options)?;
            router.route(rendered.mode, &rendered.path, &rendered.body, render)?;
        }

        Ok(())
    }
}
