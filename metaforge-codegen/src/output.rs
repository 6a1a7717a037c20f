//! Output routing: the five side-effect strategies for rendered bodies.
//!
//! The router owns all filesystem mutation in the pipeline. Aggregate mode
//! writes through a per-run file handle table so that every template
//! targeting the same path appends to one handle in generation order; the
//! table is closed exactly once at the end of the run and released on every
//! exit path.

use std::{
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{error::Result, render::RenderContext};

/// The closed set of output routing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Unconditionally write/replace the file.
    Overwrite,
    /// Write only if the file does not already exist.
    Preserve,
    /// Append to a persistent per-path handle shared across the run.
    Aggregate,
    /// Accumulate the body under a context property instead of a file.
    Property,
    /// Discard the body.
    Ignore,
}

impl FromStr for OutputMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(OutputMode::Overwrite),
            "preserve" => Ok(OutputMode::Preserve),
            "aggregate" => Ok(OutputMode::Aggregate),
            "property" => Ok(OutputMode::Property),
            "ignore" => Ok(OutputMode::Ignore),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputMode::Overwrite => "overwrite",
            OutputMode::Preserve => "preserve",
            OutputMode::Aggregate => "aggregate",
            OutputMode::Property => "property",
            OutputMode::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// Per-run table of open aggregate file handles.
///
/// A handle is opened (truncating) on the first write to its path and every
/// later write to the same path appends to it, regardless of which template
/// produced the body. At most one handle exists per path for the whole run.
#[derive(Debug, Default)]
pub struct AggregateFileManager {
    handles: IndexMap<PathBuf, File>,
}

impl AggregateFileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the handle for `path`, opening it first if needed.
    /// Returns true when this write opened the handle.
    pub fn append(&mut self, path: &Path, body: &str) -> Result<bool> {
        let opened = !self.handles.contains_key(path);
        let handle = match self.handles.entry(path.to_path_buf()) {
            indexmap::map::Entry::Occupied(entry) => entry.into_mut(),
            indexmap::map::Entry::Vacant(entry) => entry.insert(File::create(path)?),
        };
        handle.write_all(body.as_bytes())?;
        Ok(opened)
    }

    /// Number of handles currently open.
    pub fn open_count(&self) -> usize {
        self.handles.len()
    }

    /// Flush and close every handle. Called exactly once per run; dropping
    /// the manager closes any handles still open after an aborted run.
    pub fn finish(&mut self) -> Result<()> {
        for (path, mut handle) in self.handles.drain(..) {
            debug!(path = %path.display(), "closing aggregate file");
            handle.flush()?;
        }
        Ok(())
    }
}

/// A file produced by the run, for reporting.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub mode: OutputMode,
}

/// Routes rendered bodies to their destination according to the output mode.
#[derive(Debug, Default)]
pub struct OutputRouter {
    aggregates: AggregateFileManager,
    written: Vec<WrittenFile>,
}

impl OutputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Perform the side effect for one rendered body.
    pub fn route(
        &mut self,
        mode: OutputMode,
        path: &Path,
        body: &str,
        ctx: &mut RenderContext,
    ) -> Result<()> {
        info!(%mode, output = %path.display(), "routing output");
        match mode {
            OutputMode::Overwrite => {
                ensure_parent_dirs(path)?;
                fs::write(path, body)?;
                self.record(path, mode);
            }
            OutputMode::Preserve => {
                if path.exists() {
                    debug!(path = %path.display(), "preserving existing file");
                } else {
                    ensure_parent_dirs(path)?;
                    fs::write(path, body)?;
                    self.record(path, mode);
                }
            }
            OutputMode::Aggregate => {
                ensure_parent_dirs(path)?;
                if self.aggregates.append(path, body)? {
                    self.record(path, mode);
                }
            }
            OutputMode::Property => {
                let name = property_name(path);
                debug!(property = %name, "accumulating output as property");
                ctx.push_property(&name, body);
            }
            OutputMode::Ignore => {
                debug!("discarding output");
            }
        }
        Ok(())
    }

    /// Close all aggregate handles. Exactly one close per handle per run.
    pub fn flush_aggregates(&mut self) -> Result<()> {
        self.aggregates.finish()
    }

    /// Number of aggregate handles still open.
    pub fn open_aggregates(&self) -> usize {
        self.aggregates.open_count()
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[WrittenFile] {
        &self.written
    }

    pub fn take_written(&mut self) -> Vec<WrittenFile> {
        std::mem::take(&mut self.written)
    }

    fn record(&mut self, path: &Path, mode: OutputMode) {
        self.written.push(WrittenFile {
            path: path.to_path_buf(),
            mode,
        });
    }
}

/// Create any missing parent directories of an output path. Relative paths
/// keep their leading `.` anchor.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Derive the context property name from an output path: the file stem up
/// to its first dot, snake_cased (`./gen/Summary.hbs` → `summary`).
pub fn property_name(path: &Path) -> String {
    let stem = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match stem.find('.') {
        Some(dot) => &stem[..dot],
        None => &stem,
    };
    to_snake_case(stem)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_lowercase().next().unwrap_or(c));
    }
    result.replace('-', "_")
}
