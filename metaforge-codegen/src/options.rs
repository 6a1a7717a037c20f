//! Generation options and the `metaforge.toml` project configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// Options for one generation run.
///
/// Exposed to every template and script through the render context under the
/// `options` key (camelCase field names).
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Target platform name; selects `<platforms_dir>/<platform>` as the
    /// platform directory.
    pub platform: String,
    /// Root directory containing platform plugin trees and the shared
    /// `global` tree.
    pub platforms_dir: PathBuf,
    /// Output root directory for generated files.
    pub output: PathBuf,
    /// Delimiter used when rendering package paths for the target ecosystem.
    pub package_delimiter: String,
}

impl GenOptions {
    /// Directory holding the selected platform's scripts and templates.
    pub fn platform_dir(&self) -> PathBuf {
        self.platforms_dir.join(&self.platform)
    }

    /// Directory holding helpers/partials shared by every platform.
    /// Loaded before the platform's own, so platform definitions win.
    pub fn global_dir(&self) -> PathBuf {
        self.platforms_dir.join("global")
    }

    /// The `options` value templates see.
    pub fn to_render_value(&self) -> Value {
        json!({
            "platform": self.platform,
            "output": self.output.display().to_string(),
            "packageDelimiter": self.package_delimiter,
        })
    }
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            platform: String::new(),
            platforms_dir: PathBuf::from("./platforms"),
            output: PathBuf::from("./gen"),
            package_delimiter: ".".to_string(),
        }
    }
}

/// Project configuration read from `metaforge.toml`.
///
/// Every field is optional; command-line flags override file values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub platform: Option<String>,
    pub platforms_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub package_delimiter: Option<String>,
    pub model: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the given path, or defaults when the file
    /// does not exist.
    pub fn open_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_and_global_dirs() {
        let options = GenOptions {
            platform: "javascript".into(),
            platforms_dir: PathBuf::from("./platforms"),
            ..Default::default()
        };
        assert_eq!(
            options.platform_dir(),
            PathBuf::from("./platforms/javascript")
        );
        assert_eq!(options.global_dir(), PathBuf::from("./platforms/global"));
    }

    #[test]
    fn test_render_value_keys() {
        let options = GenOptions {
            platform: "javascript".into(),
            ..Default::default()
        };
        let value = options.to_render_value();
        assert_eq!(value["platform"], "javascript");
        assert_eq!(value["packageDelimiter"], ".");
        assert!(value["output"].is_string());
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let config = Config::open_or_default("/nope/metaforge.toml").unwrap();
        assert!(config.generator.platform.is_none());
    }

    #[test]
    fn test_config_parses_generator_table() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("metaforge.toml");
        std::fs::write(
            &path,
            r#"
            [generator]
            platform = "javascript"
            output = "./out"
            package_delimiter = "::"
            "#,
        )
        .unwrap();

        let config = Config::open_or_default(&path).unwrap();
        assert_eq!(config.generator.platform.as_deref(), Some("javascript"));
        assert_eq!(config.generator.output, Some(PathBuf::from("./out")));
        assert_eq!(config.generator.package_delimiter.as_deref(), Some("::"));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("metaforge.toml");
        std::fs::write(&path, "[generator\nplatform = 1").unwrap();

        assert!(matches!(
            Config::open_or_default(&path),
            Err(Error::Config { .. })
        ));
    }
}
