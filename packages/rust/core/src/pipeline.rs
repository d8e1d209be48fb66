//! End-to-end build pipeline: root → discovery → prefixes → properties → context.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use ldcontext_discovery::TurtleDiscovery;
use ldcontext_ontology::{collect_prefixes, extract_properties};
use ldcontext_shared::{DiscoveryConfig, OntologyCatalog, PrefixTable, Result};

use crate::assembler::{ContextDocument, assemble};

/// Configuration for a context build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root; must contain the discovery root marker.
    pub root: PathBuf,
    /// File discovery settings.
    pub discovery: DiscoveryConfig,
}

/// Counts and timing of a finished build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSummary {
    /// Turtle files processed.
    pub file_count: usize,
    /// Distinct prefixes in the context.
    pub prefix_count: usize,
    /// Datatype property occurrences recorded.
    pub datatype_property_count: usize,
    /// Object property occurrences recorded.
    pub object_property_count: usize,
    /// Declarations that could not be named.
    pub skipped_count: usize,
    /// Entries in the final `@context`.
    pub entry_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Result of [`ContextBuilder::run`].
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub document: ContextDocument,
    pub summary: BuildSummary,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each Turtle file has been parsed.
    fn file_processed(&self, path: &Path, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &BuildSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _summary: &BuildSummary) {}
}

/// Owns the state of one context build.
///
/// The discovery object caches the file list, the prefix table and the
/// catalog are filled during [`run`](Self::run) and only read afterwards.
#[derive(Debug)]
pub struct ContextBuilder {
    discovery: TurtleDiscovery,
    prefixes: PrefixTable,
    catalog: OntologyCatalog,
}

impl ContextBuilder {
    pub fn new(config: &BuildConfig) -> Self {
        Self {
            discovery: TurtleDiscovery::new(&config.root, &config.discovery),
            prefixes: PrefixTable::new(),
            catalog: OntologyCatalog::new(),
        }
    }

    /// Discovered input files (computed on first call).
    pub fn files(&mut self) -> Result<&[PathBuf]> {
        self.discovery.files()
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    pub fn catalog(&self) -> &OntologyCatalog {
        &self.catalog
    }

    /// Run the full build.
    ///
    /// 1. Discover Turtle files
    /// 2. Collect prefixes (conflicts abort)
    /// 3. Extract datatype and object properties
    /// 4. Assemble the context document
    ///
    /// Nothing is written here; the caller decides where the document goes.
    #[instrument(skip_all, fields(root = %self.discovery.root().display()))]
    pub fn run(&mut self, progress: &dyn ProgressReporter) -> Result<BuildOutput> {
        let start = Instant::now();

        // --- Phase 1: Discovery ---
        progress.phase("Discovering Turtle files");
        let files = self.discovery.files()?.to_vec();
        for file in &files {
            tracing::debug!(path = %file.display(), "input file");
        }

        // --- Phase 2: Prefixes ---
        progress.phase("Collecting prefixes");
        collect_prefixes(&files, &mut self.prefixes)?;

        // --- Phase 3: Properties ---
        progress.phase("Extracting properties");
        let stats = extract_properties(&files, &self.prefixes, &mut self.catalog, |path, current, total| {
            progress.file_processed(path, current, total)
        })?;

        // --- Phase 4: Assembly ---
        progress.phase("Assembling context");
        let document = assemble(&self.prefixes, &self.catalog);

        let summary = BuildSummary {
            file_count: files.len(),
            prefix_count: self.prefixes.len(),
            datatype_property_count: stats.datatype_properties,
            object_property_count: stats.object_properties,
            skipped_count: stats.skipped,
            entry_count: document.len(),
            elapsed: start.elapsed(),
        };

        info!(
            files = summary.file_count,
            prefixes = summary.prefix_count,
            entries = summary.entry_count,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "context build complete"
        );
        progress.done(&summary);

        Ok(BuildOutput { document, summary })
    }
}

/// Convenience wrapper: build the context for `config` in one call.
pub fn build_context(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildOutput> {
    ContextBuilder::new(config).run(progress)
}
