//! Lifecycle scripts for the JavaScript platform.

use metaforge_codegen::{Hook, Result, ScriptContext, ScriptPlugin};
use metaforge_model::{MetaClass, Stereotype};
use serde_json::json;

use crate::mixins;

/// Project script that attaches the platform's mixins before the model walk
/// and summarizes walk results for project-level templates.
pub struct TemplateSupport;

impl ScriptPlugin for TemplateSupport {
    fn name(&self) -> &'static str {
        "template-support"
    }

    fn hooks(&self) -> &'static [Hook] {
        &[Hook::Platform, Hook::ProjectTemplates]
    }

    fn init_platform(&self, ctx: &mut ScriptContext) -> Result<()> {
        mixins::register(ctx.mixins);
        Ok(())
    }

    fn init_project_templates(&self, ctx: &mut ScriptContext) -> Result<()> {
        let count = ctx
            .data
            .get("entityClasses")
            .and_then(|v| v.as_array())
            .map(Vec::len)
            .unwrap_or(0);
        ctx.data.insert("entityCount", json!(count));
        Ok(())
    }
}

/// Stereotype script for `entity` classes: records every entity class seen
/// so project templates can iterate them.
pub struct EntityTracker;

impl ScriptPlugin for EntityTracker {
    fn name(&self) -> &'static str {
        "entity-tracker"
    }

    fn hooks(&self) -> &'static [Hook] {
        &[Hook::Stereotype, Hook::Class]
    }

    fn init_stereotype(&self, ctx: &mut ScriptContext, _stereotype: &Stereotype) -> Result<()> {
        if ctx.data.get("entityClasses").is_none() {
            ctx.data.insert("entityClasses", json!([]));
        }
        Ok(())
    }

    fn init_class(&self, ctx: &mut ScriptContext, class: &MetaClass) -> Result<()> {
        ctx.data.push_property("entityClasses", &class.name);
        Ok(())
    }
}
