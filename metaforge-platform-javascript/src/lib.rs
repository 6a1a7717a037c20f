//! JavaScript platform plugin for Metaforge.
//!
//! Generates JavaScript/Node sources from a meta-model: the platform
//! descriptor registers the naming mixins (`jsIdentifierName`,
//! `jsClassNameWithPath`, `pluralName`, comment wrapping), a small set of
//! native template helpers, and the lifecycle scripts for the `entity`
//! stereotype. Templates themselves live on disk under the platform
//! directory and are resolved by stereotype at generation time.

mod helpers;
mod mixins;
mod naming;
mod scripts;

use metaforge_codegen::Platform;

pub use crate::naming::{js_identifier, js_path, plural, wrap_comment};
pub use crate::scripts::{EntityTracker, TemplateSupport};

/// The name this platform registers under; also its directory name below
/// the platforms root.
pub const PLATFORM_NAME: &str = "javascript";

/// Build the JavaScript platform descriptor.
pub fn platform() -> Platform {
    Platform::new(PLATFORM_NAME)
        .script("", scripts::TemplateSupport)
        .script("Entity", scripts::EntityTracker)
        .helper("json", Box::new(helpers::json))
        .helper("lowerFirst", Box::new(helpers::lower_first))
        .helper("upperFirst", Box::new(helpers::upper_first))
}
