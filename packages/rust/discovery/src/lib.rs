//! Turtle file discovery for ldcontext.
//!
//! Before reading anything, discovery checks that the project root carries the
//! expected marker (a `.git` entry by default) so the tool is never pointed at
//! an unrelated directory. It then walks the root, or a set of its
//! subdirectories, for `.ttl` files and drops CI validation artifacts and the
//! legacy aggregate ontology file.

use std::path::{Path, PathBuf};

use ldcontext_shared::{DiscoveryConfig, LdContextError, Result};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// File extension of Turtle documents.
const TURTLE_EXTENSION: &str = "ttl";

// ---------------------------------------------------------------------------
// TurtleDiscovery
// ---------------------------------------------------------------------------

/// Finds the Turtle files of an ontology tree.
///
/// The file list is computed once, on the first call to [`files`](Self::files),
/// and reused afterwards.
#[derive(Debug, Clone)]
pub struct TurtleDiscovery {
    root: PathBuf,
    config: DiscoveryConfig,
    cached: Option<Vec<PathBuf>>,
}

impl TurtleDiscovery {
    /// Create a discovery rooted at `root`. Nothing is read until [`files`](Self::files).
    pub fn new(root: impl Into<PathBuf>, config: &DiscoveryConfig) -> Self {
        Self {
            root: root.into(),
            config: config.clone(),
            cached: None,
        }
    }

    /// The project root this discovery searches.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the file list has been computed already.
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Return the discovered Turtle files, walking the tree on first use.
    pub fn files(&mut self) -> Result<&[PathBuf]> {
        if self.cached.is_none() {
            let found = self.discover()?;
            self.cached = Some(found);
        }
        Ok(self.cached.as_deref().unwrap_or_default())
    }

    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn discover(&self) -> Result<Vec<PathBuf>> {
        check_root_marker(&self.root, &self.config.root_marker)?;

        let search_roots: Vec<PathBuf> = if self.config.subdirs.is_empty() {
            vec![self.root.clone()]
        } else {
            self.config
                .subdirs
                .iter()
                .map(|dir| self.root.join(dir))
                .collect()
        };

        let mut files = Vec::new();
        for dir in &search_roots {
            if !dir.is_dir() {
                warn!(dir = %dir.display(), "search directory does not exist, skipping");
                continue;
            }
            walk_turtle_files(dir, &self.config, &mut files)?;
        }

        info!(count = files.len(), "discovered Turtle files");
        Ok(files)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fail unless `marker` exists directly under `root`.
pub fn check_root_marker(root: &Path, marker: &str) -> Result<()> {
    if root.join(marker).exists() {
        return Ok(());
    }
    Err(LdContextError::environment(format!(
        "'{marker}' not found in {}; is this the project root?",
        root.display()
    )))
}

fn walk_turtle_files(dir: &Path, config: &DiscoveryConfig, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            match e.into_io_error() {
                Some(source) => LdContextError::io(path, source),
                None => LdContextError::environment(format!(
                    "filesystem loop detected at {}",
                    path.display()
                )),
            }
        })?;

        if !entry.file_type().is_file() || !is_turtle(entry.path()) {
            continue;
        }
        if is_excluded(entry.path(), config) {
            debug!(path = %entry.path().display(), "excluded");
            continue;
        }
        out.push(entry.into_path());
    }
    Ok(())
}

fn is_turtle(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TURTLE_EXTENSION))
}

/// Whether `path` is a validation artifact or an excluded file name.
pub fn is_excluded(path: &Path, config: &DiscoveryConfig) -> bool {
    let as_str = path.to_string_lossy();
    if config
        .exclude_markers
        .iter()
        .any(|marker| as_str.contains(marker.as_str()))
    {
        return true;
    }
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| config.exclude_files.iter().any(|f| *f == name))
}
