//! Platform plugin descriptors and the helper/partial loader.
//!
//! A platform is a directory tree of templates plus a compiled-in descriptor
//! of script plugins and native template helpers. Scripts declare which
//! lifecycle hooks they implement; the pipeline skips the rest. Script
//! registrations are keyed by platform-relative directory so alias
//! redirection applies to them the same way it applies to templates.
//!
//! Helpers and partials are global, keyed by file base name, and collisions
//! overwrite silently: the shared `global` tree is loaded before the
//! platform's own tree, so platform definitions take precedence.

use std::{fs, path::Path, sync::Arc};

use handlebars::{Handlebars, HelperDef};
use indexmap::IndexMap;
use metaforge_model::{MetaClass, Stereotype};
use tracing::debug;

use crate::{
    error::{Error, Result},
    paths::PathResolver,
    scripts::ScriptContext,
};

/// Lifecycle hooks a script plugin may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Called once, globally, before any model walk.
    Platform,
    /// Called once, after all per-class processing, before project-level
    /// templates render.
    ProjectTemplates,
    /// Called once per distinct stereotype name.
    Stereotype,
    /// Called once per distinct fully-qualified class name.
    Class,
}

/// A unit of generation-time logic contributed by a platform.
///
/// All hooks default to no-ops; [`ScriptPlugin::hooks`] is the descriptor
/// the pipeline consults, so a hook that is not listed there is never
/// invoked even if overridden.
pub trait ScriptPlugin: Send + Sync {
    /// Unique name within the platform, used for execution records and
    /// error reporting.
    fn name(&self) -> &'static str;

    /// The lifecycle hooks this script implements.
    fn hooks(&self) -> &'static [Hook] {
        &[]
    }

    fn init_platform(&self, ctx: &mut ScriptContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn init_project_templates(&self, ctx: &mut ScriptContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn init_stereotype(&self, ctx: &mut ScriptContext, stereotype: &Stereotype) -> Result<()> {
        let _ = (ctx, stereotype);
        Ok(())
    }

    fn init_class(&self, ctx: &mut ScriptContext, class: &MetaClass) -> Result<()> {
        let _ = (ctx, class);
        Ok(())
    }
}

struct ScriptRegistration {
    /// Platform-relative directory the script belongs to; empty for project
    /// scripts at the platform root.
    location: String,
    script: Arc<dyn ScriptPlugin>,
}

/// A platform plugin descriptor: scripts keyed by location plus native
/// template helpers.
pub struct Platform {
    name: String,
    scripts: Vec<ScriptRegistration>,
    helpers: Vec<(String, Box<dyn HelperDef + Send + Sync>)>,
}

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scripts: Vec::new(),
            helpers: Vec::new(),
        }
    }

    /// The platform name; also its directory name under the platforms root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a script plugin. An empty location means a project script
    /// at the platform root; any other location is a stereotype directory.
    pub fn script(mut self, location: &str, script: impl ScriptPlugin + 'static) -> Self {
        self.scripts.push(ScriptRegistration {
            location: location.to_string(),
            script: Arc::new(script),
        });
        self
    }

    /// Register a native template helper under the given name.
    pub fn helper(
        mut self,
        name: impl Into<String>,
        helper: Box<dyn HelperDef + Send + Sync>,
    ) -> Self {
        self.helpers.push((name.into(), helper));
        self
    }

    /// Project scripts (registered at the platform root).
    pub fn project_scripts(&self) -> Vec<Arc<dyn ScriptPlugin>> {
        self.scripts_for("")
    }

    /// Scripts registered for a platform-relative directory, in
    /// registration order.
    pub fn scripts_for(&self, location: &str) -> Vec<Arc<dyn ScriptPlugin>> {
        self.scripts
            .iter()
            .filter(|reg| reg.location == location)
            .map(|reg| Arc::clone(&reg.script))
            .collect()
    }

    /// Drain the native helpers into the templating engine.
    pub fn register_helpers(&mut self, engine: &mut Handlebars<'_>) {
        for (name, helper) in self.helpers.drain(..) {
            debug!(helper = %name, "registering native helper");
            engine.register_helper(&name, helper);
        }
    }
}

/// Registry of available platforms, keyed by name.
#[derive(Default)]
pub struct PlatformRegistry {
    platforms: IndexMap<String, Platform>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a platform. A later platform with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, platform: Platform) {
        self.platforms.insert(platform.name().to_string(), platform);
    }

    /// Remove and return a platform by name.
    pub fn take(&mut self, name: &str) -> Option<Platform> {
        self.platforms.shift_remove(name)
    }

    /// Registered platform names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.platforms.keys().map(String::as_str).collect()
    }
}

/// Load `_helpers/*.rhai` script helpers from a base directory, registered
/// under their file base names. Returns the number registered.
pub fn load_helpers(
    engine: &mut Handlebars<'_>,
    resolver: &PathResolver,
    base_dir: &Path,
) -> Result<usize> {
    debug!(dir = %base_dir.display(), "loading helpers");
    let files = resolver.resolve(base_dir, Some("_helpers"), ".rhai");
    for file in &files {
        let name = base_name(file);
        engine
            .register_script_helper_file(&name, file)
            .map_err(|source| Error::Helper {
                name: name.clone(),
                source: Box::new(source),
            })?;
    }
    Ok(files.len())
}

/// Load `_partials/*.hbs` template fragments from a base directory,
/// registered under their file base names. Returns the number registered.
pub fn load_partials(
    engine: &mut Handlebars<'_>,
    resolver: &PathResolver,
    base_dir: &Path,
) -> Result<usize> {
    debug!(dir = %base_dir.display(), "loading partials");
    let files = resolver.resolve(base_dir, Some("_partials"), ".hbs");
    for file in &files {
        let name = base_name(file);
        let source = fs::read_to_string(file)?;
        engine
            .register_template_string(&name, source)
            .map_err(|source| Error::Partial {
                name: name.clone(),
                source: Box::new(source),
            })?;
    }
    Ok(files.len())
}

/// File name without its final extension (`classHeader.hbs` → `classHeader`).
fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    struct NullScript;

    impl ScriptPlugin for NullScript {
        fn name(&self) -> &'static str {
            "null"
        }
    }

    #[test]
    fn test_scripts_are_keyed_by_location() {
        let platform = Platform::new("javascript")
            .script("", NullScript)
            .script("entity", NullScript);

        assert_eq!(platform.project_scripts().len(), 1);
        assert_eq!(platform.scripts_for("entity").len(), 1);
        assert!(platform.scripts_for("service").is_empty());
    }

    #[test]
    fn test_registry_take() {
        let mut registry = PlatformRegistry::new();
        registry.register(Platform::new("javascript"));

        assert_eq!(registry.names(), vec!["javascript"]);
        assert!(registry.take("javascript").is_some());
        assert!(registry.take("javascript").is_none());
    }

    #[test]
    fn test_load_partials_registers_by_base_name() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("_partials");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("header.hbs"), "// {{name}}").unwrap();

        let mut engine = Handlebars::new();
        let resolver = PathResolver::new(temp.path());
        let count = load_partials(&mut engine, &resolver, temp.path()).unwrap();

        assert_eq!(count, 1);
        let out = engine
            .render_template("{{> header}}", &json!({ "name": "Order" }))
            .unwrap();
        assert_eq!(out, "// Order");
    }

    #[test]
    fn test_load_partials_platform_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global/_partials");
        let platform = temp.path().join("javascript/_partials");
        fs::create_dir_all(&global).unwrap();
        fs::create_dir_all(&platform).unwrap();
        fs::write(global.join("header.hbs"), "global").unwrap();
        fs::write(platform.join("header.hbs"), "platform").unwrap();

        let mut engine = Handlebars::new();
        let resolver = PathResolver::new(temp.path().join("javascript"));
        load_partials(&mut engine, &resolver, &temp.path().join("global")).unwrap();
        load_partials(&mut engine, &resolver, &temp.path().join("javascript")).unwrap();

        let out = engine.render_template("{{> header}}", &json!({})).unwrap();
        assert_eq!(out, "platform");
    }

    #[test]
    fn test_load_helpers_registers_rhai_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("_helpers");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("shout.rhai"), "params[0].to_upper()").unwrap();

        let mut engine = Handlebars::new();
        let resolver = PathResolver::new(temp.path());
        let count = load_helpers(&mut engine, &resolver, temp.path()).unwrap();

        assert_eq!(count, 1);
        let out = engine
            .render_template("{{shout name}}", &json!({ "name": "order" }))
            .unwrap();
        assert_eq!(out, "ORDER");
    }
}
