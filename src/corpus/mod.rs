// src/corpus/mod.rs

pub mod output;

pub use output::{write_document, AggregateOutputDocument};

use anyhow::{bail, Context, Result};
use glob::glob;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::config::MIRROR_DIR;
use crate::record::{BuildOutcome, NormalizedCountryRecord, RecordBuilder};

/// Per-run tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total_files: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunStats {
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.processed as f64 / self.total_files as f64 * 100.0
        }
    }
}

/// Records accumulated over one pass, keyed by output code.
#[derive(Debug, Default)]
pub struct Accumulator {
    countries: BTreeMap<String, NormalizedCountryRecord>,
    stats: RunStats,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a discovered unit before it is processed.
    pub fn discovered(&mut self, n: usize) {
        self.stats.total_files += n;
    }

    /// Fold one unit's result in. A later record sharing a code replaces the
    /// earlier one.
    pub fn record(&mut self, unit: &str, result: Result<BuildOutcome>) {
        match result {
            Ok(BuildOutcome::Built(rec)) => {
                info!(code = %rec.code, name = %rec.name, fips = ?rec.fips_code, "✓ built");
                if let Some(prev) = self.countries.insert(rec.code.clone(), rec) {
                    debug!(code = %prev.code, unit, "replaced earlier record with same code");
                }
                self.stats.processed += 1;
            }
            Ok(BuildOutcome::Skipped { unit, reason }) => {
                warn!(unit = %unit, "skipped: {}", reason);
                self.stats.skipped += 1;
            }
            Err(e) => {
                warn!(unit, error = %format!("{:#}", e), "error processing unit");
                self.stats.errors += 1;
            }
        }
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn countries(&self) -> &BTreeMap<String, NormalizedCountryRecord> {
        &self.countries
    }

    /// Seal the pass into its output document.
    pub fn into_document(self, version: &str, source: &str) -> (AggregateOutputDocument, RunStats) {
        let doc = AggregateOutputDocument::new(version, source, self.stats.processed, self.countries);
        (doc, self.stats)
    }
}

/// Walks the regional directories of a local `factbook.json` mirror.
pub struct CorpusWalker {
    root: PathBuf,
    builder: RecordBuilder,
}

impl CorpusWalker {
    /// `data_dir` is the directory holding the `factbook.json` clone.
    pub fn new(data_dir: impl AsRef<Path>, builder: RecordBuilder) -> Self {
        Self {
            root: data_dir.as_ref().join(MIRROR_DIR),
            builder,
        }
    }

    /// Build every country file of the variant's regions.
    ///
    /// A missing mirror root aborts the run; anything wrong with a single file
    /// is tallied and the walk continues.
    #[instrument(level = "info", skip(self), fields(root = %self.root.display()))]
    pub fn walk(&self) -> Result<Accumulator> {
        if !self.root.is_dir() {
            bail!(
                "factbook.json mirror not found at {} (clone https://github.com/factbook/factbook.json.git there)",
                self.root.display()
            );
        }
        info!("found mirror");

        let mut acc = Accumulator::new();
        for region in self.builder.variant().regions() {
            let region_dir = self.root.join(region);
            if !region_dir.is_dir() {
                debug!(region, "region directory absent");
                continue;
            }

            let files = region_files(&region_dir)?;
            acc.discovered(files.len());
            info!(region, files = files.len(), "processing region");

            for file in files {
                let unit = unit_id(&file);
                let result = self.process_file(&file, &unit);
                acc.record(&unit, result);
            }
        }
        Ok(acc)
    }

    fn process_file(&self, path: &Path, unit: &str) -> Result<BuildOutcome> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let doc: Value = serde_json::from_str(&raw)
            .with_context(|| format!("decoding {}", path.display()))?;
        self.builder
            .build(unit, &doc)
            .with_context(|| format!("building {}", path.display()))
    }
}

/// `*.json` files directly under `dir`, in path order.
fn region_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "unreadable glob entry"),
        }
    }
    files.sort();
    Ok(files)
}

/// File stem used as the source identifier.
fn unit_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Walk the mirror under `data_dir`, write the aggregate to `output`, and log
/// the run summary.
pub fn extract_offline(
    data_dir: &Path,
    output: &Path,
    builder: RecordBuilder,
) -> Result<(AggregateOutputDocument, RunStats)> {
    let variant = builder.variant();
    let walker = CorpusWalker::new(data_dir, builder);
    let acc = walker.walk()?;
    let (doc, stats) = acc.into_document(variant.version(), variant.source());

    let bytes = write_document(output, &doc)?;
    info!(
        total_files = stats.total_files,
        processed = stats.processed,
        skipped = stats.skipped,
        errors = stats.errors,
        "processing complete; success rate {:.1}%",
        stats.success_rate()
    );
    info!(
        path = %output.display(),
        "saved {:.1} KB",
        bytes as f64 / 1024.0
    );
    Ok((doc, stats))
}
