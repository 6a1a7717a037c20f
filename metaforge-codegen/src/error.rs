//! Typed error taxonomy for the generation pipeline.
//!
//! Every variant here is fatal and aborts the run: generated output can feed
//! later templates (property-mode accumulation), so partial output is unsafe
//! to trust. Advisory conditions (missing hooks, empty discovery) are
//! reported as [`crate::pipeline::Diagnostic`]s instead and never appear
//! here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The model failed semantic validation. Raised before any output is
    /// written.
    #[error("model validation failed with {errors} error(s)")]
    Validation { errors: usize },

    /// A template emitted an `##output` directive with a mode outside the
    /// closed set. A malformed directive indicates a broken plugin.
    #[error("unknown output directive '{mode}' in template {}", template.display())]
    UnknownOutputDirective { mode: String, template: PathBuf },

    /// The templating engine rejected a template at compile or render time.
    #[error("failed to render template {}", template.display())]
    Template {
        template: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// A partial failed to compile during registration.
    #[error("failed to register partial '{name}'")]
    Partial {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// A script helper file failed to compile during registration.
    #[error("failed to register helper '{name}'")]
    Helper {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A plugin script lifecycle hook failed.
    #[error("script '{script}' failed: {message}")]
    Script { script: String, message: String },

    /// A registered mixin getter or method failed.
    #[error("mixin '{name}' on {kind} failed: {message}")]
    Mixin {
        kind: &'static str,
        name: String,
        message: String,
    },

    /// The project configuration file could not be parsed.
    #[error("failed to parse '{}'", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a script failure error.
    pub fn script(script: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Script {
            script: script.into(),
            message: message.into(),
        }
    }
}
