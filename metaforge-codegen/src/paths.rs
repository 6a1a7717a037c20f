//! Stereotype-aware path resolution for scripts, templates, helpers, and
//! partials.
//!
//! Resolution turns a (base directory, stereotype, extension) triple into a
//! concrete file list. A directory may contain an `alias.json` redirect file
//! whose content (a JSON string) substitutes a platform-relative directory
//! for the whole lookup, letting one stereotype reuse another's tree without
//! duplication.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

/// The redirect file name checked in every resolved directory.
const ALIAS_FILE: &str = "alias.json";

/// Resolves stereotype-keyed directories under a platform tree.
#[derive(Debug, Clone)]
pub struct PathResolver {
    platform_dir: PathBuf,
}

impl PathResolver {
    pub fn new(platform_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform_dir: platform_dir.into(),
        }
    }

    /// The platform directory alias redirects are resolved against.
    pub fn platform_dir(&self) -> &Path {
        &self.platform_dir
    }

    /// Resolve the search directory for a stereotype, applying alias
    /// redirection.
    pub fn resolve_dir(&self, base_dir: &Path, stereotype: Option<&str>) -> PathBuf {
        let mut dir = base_dir.to_path_buf();
        if let Some(name) = stereotype {
            dir.push(name);
        }

        match read_alias(&dir) {
            Some(alias) => {
                let redirected = self.platform_dir.join(&alias);
                debug!(
                    from = %dir.display(),
                    to = %redirected.display(),
                    "alias redirect"
                );
                redirected
            }
            None => dir,
        }
    }

    /// List the files in the resolved directory whose names end with the
    /// given extension, sorted by name for reproducible output order.
    /// A missing directory yields an empty list, not an error.
    pub fn resolve(
        &self,
        base_dir: &Path,
        stereotype: Option<&str>,
        extension: &str,
    ) -> Vec<PathBuf> {
        let dir = self.resolve_dir(base_dir, stereotype);
        files_with_extension(&dir, extension)
    }

    /// The platform-relative location key for a resolved directory, used to
    /// look up registered scripts. Directories outside the platform tree
    /// have no location.
    pub fn location_of(&self, dir: &Path) -> Option<String> {
        dir.strip_prefix(&self.platform_dir)
            .ok()
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
    }
}

fn read_alias(dir: &Path) -> Option<String> {
    let path = dir.join(ALIAS_FILE);
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<String>(&content) {
        Ok(alias) => Some(alias),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable alias file");
            None
        }
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(extension))
        })
        .collect();

    files.sort();
    files
}
