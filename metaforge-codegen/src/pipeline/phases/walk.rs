//! WalkModel phase - the per-class, per-stereotype generation loop.

use tracing::debug;

use crate::{
    entity::class_entity,
    error::Result,
    pipeline::{GenerationContext, Phase},
    render::render_template_file,
    scripts::{InitTarget, ScriptContext},
};

/// Phase that walks classes in model order and, within each class, its
/// stereotypes in declaration order. For each (class, stereotype) pair it
/// runs every project script's per-kind hooks, then every stereotype
/// script's, then renders every template resolved for the stereotype
/// against the class.
///
/// Aggregate-mode output order depends on this traversal order, so the walk
/// is strictly sequential.
pub struct WalkModelPhase;

impl Phase for WalkModelPhase {
    fn name(&self) -> &'static str {
        "walk"
    }

    fn description(&self) -> &'static str {
        "Run scripts and templates for every class and stereotype"
    }

    fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        let GenerationContext {
            model,
            options,
            platform,
            engine,
            mixins,
            resolver,
            runner,
            router,
            render,
            scripts_seen,
            templates_seen,
            ..
        } = ctx;
        let platform_dir = options.platform_dir();

        for class in &model.classes {
            for stereotype in &class.stereotypes {
                debug!(
                    class = %class.qualified_name(),
                    stereotype = %stereotype.name,
                    "processing class"
                );

                for script in platform.project_scripts() {
                    let mut sctx = ScriptContext {
                        mixins: &mut *mixins,
                        data: &mut *render,
                        options: &*options,
                    };
                    runner.run_once(
                        script.as_ref(),
                        InitTarget::Stereotype(stereotype),
                        &mut sctx,
                    )?;
                    runner.run_once(script.as_ref(), InitTarget::Class(class), &mut sctx)?;
                }

                // Stereotype scripts are keyed by the alias-resolved
                // platform-relative directory.
                let dir = resolver.resolve_dir(&platform_dir, Some(&stereotype.name));
                let location = resolver
                    .location_of(&dir)
                    .unwrap_or_else(|| stereotype.name.clone());
                let scripts = platform.scripts_for(&location);
                *scripts_seen += scripts.len();
                for script in scripts {
                    let mut sctx = ScriptContext {
                        mixins: &mut *mixins,
                        data: &mut *render,
                        options: &*options,
                    };
                    runner.run_once(
                        script.as_ref(),
                        InitTarget::Stereotype(stereotype),
                        &mut sctx,
                    )?;
                    runner.run_once(script.as_ref(), InitTarget::Class(class), &mut sctx)?;
                }

                let templates = resolver.resolve(&platform_dir, Some(&stereotype.name), ".hbs");
                *templates_seen += templates.len();
                if templates.is_empty() {
                    continue;
                }

                let entity = class_entity(class, stereotype, mixins, options)?;
                render.set_class(entity);
                for template in &templates {
                    let rendered =
                        render_template_file(engine, template, Some(class), render, options)?;
                    router.route(rendered.mode, &rendered.path, &rendered.body, render)?;
                }
            }
        }

        Ok(())
    }
}
