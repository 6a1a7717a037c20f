//! Once-per-identity execution of plugin script hooks.
//!
//! The model walk revisits the same (stereotype, class) combinations once per
//! stereotype a class carries, and the same script is consulted at multiple
//! points in the walk. The runner guarantees each script still initializes
//! its state for a given stereotype or class exactly once per generation run.

use std::collections::HashSet;

use metaforge_model::{MetaClass, Stereotype};
use tracing::debug;

use crate::{
    error::Result,
    mixin::MixinRegistry,
    options::GenOptions,
    plugin::{Hook, ScriptPlugin},
    render::RenderContext,
};

/// The per-identity initializer kinds dispatched by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitKind {
    Stereotype,
    Class,
}

impl InitKind {
    fn hook(self) -> Hook {
        match self {
            InitKind::Stereotype => Hook::Stereotype,
            InitKind::Class => Hook::Class,
        }
    }
}

/// The identity a hook initializes for: a stereotype, or a class keyed by
/// its fully-qualified name so same-named classes in different packages do
/// not share execution records.
pub enum InitTarget<'a> {
    Stereotype(&'a Stereotype),
    Class(&'a MetaClass),
}

impl InitTarget<'_> {
    fn kind(&self) -> InitKind {
        match self {
            InitTarget::Stereotype(_) => InitKind::Stereotype,
            InitTarget::Class(_) => InitKind::Class,
        }
    }

    fn identity(&self) -> String {
        match self {
            InitTarget::Stereotype(s) => s.name.clone(),
            InitTarget::Class(c) => c.qualified_name(),
        }
    }
}

/// Mutable state handed to script hooks: the mixin registry, the shared
/// render context, and the run options.
pub struct ScriptContext<'a> {
    pub mixins: &'a mut MixinRegistry,
    pub data: &'a mut RenderContext,
    pub options: &'a GenOptions,
}

/// Tracks which (script, kind, identity) triples have already executed in
/// this run.
#[derive(Debug, Default)]
pub struct ScriptRunner {
    executed: HashSet<(String, InitKind, String)>,
}

impl ScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke the script's initializer for the target's kind at most once
    /// per (script, kind, identity) triple across the whole run.
    ///
    /// The triple is marked executed *before* the hook runs, so a hook's own
    /// side effects cannot cause re-entrant duplicate execution. A script
    /// whose descriptor does not list the hook is skipped, and the triple is
    /// still marked.
    pub fn run_once(
        &mut self,
        script: &dyn ScriptPlugin,
        target: InitTarget<'_>,
        ctx: &mut ScriptContext,
    ) -> Result<()> {
        let kind = target.kind();
        let key = (script.name().to_string(), kind, target.identity());
        if !self.executed.insert(key) {
            return Ok(());
        }

        if !script.hooks().contains(&kind.hook()) {
            debug!(script = script.name(), ?kind, "script has no hook, skipping");
            return Ok(());
        }

        match target {
            InitTarget::Stereotype(stereotype) => script.init_stereotype(ctx, stereotype),
            InitTarget::Class(class) => script.init_class(ctx, class),
        }
    }

    /// True when the triple has already been marked this run.
    pub fn has_run(&self, script: &str, kind: InitKind, identity: &str) -> bool {
        self.executed
            .contains(&(script.to_string(), kind, identity.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use metaforge_model::parse_str;

    use super::*;
    use crate::plugin::Hook;

    static STEREO_CALLS: AtomicUsize = AtomicUsize::new(0);
    static CLASS_CALLS: AtomicUsize = AtomicUsize::new(0);

    struct CountingScript;

    impl ScriptPlugin for CountingScript {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn hooks(&self) -> &'static [Hook] {
            &[Hook::Stereotype, Hook::Class]
        }

        fn init_stereotype(&self, _ctx: &mut ScriptContext, _s: &Stereotype) -> Result<()> {
            STEREO_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn init_class(&self, _ctx: &mut ScriptContext, _c: &MetaClass) -> Result<()> {
            CLASS_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fixture() -> (MixinRegistry, RenderContext, GenOptions) {
        let model = parse_str(r#"{ "name": "Shop" }"#).unwrap();
        let options = GenOptions::default();
        let render = RenderContext::new(&model, &options).unwrap();
        (MixinRegistry::new(), render, options)
    }

    #[test]
    fn test_run_once_collapses_repeats() {
        let (mut mixins, mut data, options) = fixture();
        let mut runner = ScriptRunner::new();
        let script = CountingScript;
        let stereotype = Stereotype::new("Entity");

        STEREO_CALLS.store(0, Ordering::SeqCst);
        for _ in 0..5 {
            let mut ctx = ScriptContext {
                mixins: &mut mixins,
                data: &mut data,
                options: &options,
            };
            runner
                .run_once(&script, InitTarget::Stereotype(&stereotype), &mut ctx)
                .unwrap();
        }

        assert_eq!(STEREO_CALLS.load(Ordering::SeqCst), 1);
        assert!(runner.has_run("counting", InitKind::Stereotype, "Entity"));
    }

    #[test]
    fn test_same_class_name_in_different_packages_runs_twice() {
        let (mut mixins, mut data, options) = fixture();
        let model = parse_str(
            r#"{
                "name": "Shop",
                "classes": [
                    { "name": "Order", "package": "sales", "stereotypes": ["Entity"] },
                    { "name": "Order", "package": "archive", "stereotypes": ["Entity"] }
                ]
            }"#,
        )
        .unwrap();

        let mut runner = ScriptRunner::new();
        let script = CountingScript;

        CLASS_CALLS.store(0, Ordering::SeqCst);
        for class in &model.classes {
            let mut ctx = ScriptContext {
                mixins: &mut mixins,
                data: &mut data,
                options: &options,
            };
            runner
                .run_once(&script, InitTarget::Class(class), &mut ctx)
                .unwrap();
        }

        assert_eq!(CLASS_CALLS.load(Ordering::SeqCst), 2);
        assert!(runner.has_run("counting", InitKind::Class, "sales::Order"));
        assert!(runner.has_run("counting", InitKind::Class, "archive::Order"));
    }

    #[test]
    fn test_missing_hook_is_skipped_but_marked() {
        struct Hookless;
        impl ScriptPlugin for Hookless {
            fn name(&self) -> &'static str {
                "hookless"
            }
        }

        let (mut mixins, mut data, options) = fixture();
        let mut runner = ScriptRunner::new();
        let stereotype = Stereotype::new("Entity");
        let mut ctx = ScriptContext {
            mixins: &mut mixins,
            data: &mut data,
            options: &options,
        };

        runner
            .run_once(&Hookless, InitTarget::Stereotype(&stereotype), &mut ctx)
            .unwrap();
        assert!(runner.has_run("hookless", InitKind::Stereotype, "Entity"));
    }
}
