// src/corpus/output.rs

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::record::NormalizedCountryRecord;

/// The single JSON document a run produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateOutputDocument {
    pub version: String,
    pub source: String,
    pub extracted_at: String,
    pub total_countries: usize,
    pub countries: BTreeMap<String, NormalizedCountryRecord>,
}

impl AggregateOutputDocument {
    /// Wrap `countries` with today's local date.
    pub fn new(
        version: &str,
        source: &str,
        total_countries: usize,
        countries: BTreeMap<String, NormalizedCountryRecord>,
    ) -> Self {
        Self {
            version: version.to_string(),
            source: source.to_string(),
            extracted_at: Local::now().format("%Y-%m-%d").to_string(),
            total_countries,
            countries,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Pretty-print `doc` to `path` through a sibling temp file, so readers never
/// see a half-written document. Returns the number of bytes written.
pub fn write_document(path: &Path, doc: &AggregateOutputDocument) -> Result<u64> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let json = serde_json::to_string_pretty(doc)?;
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("moving output into place at {}", path.display()))?;

    debug!(path = %path.display(), bytes = json.len(), "wrote aggregate document");
    Ok(json.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_pretty_utf8_and_reads_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("out.json");

        let mut countries = BTreeMap::new();
        countries.insert(
            "CI".to_string(),
            NormalizedCountryRecord::new("CI", "Côte d'Ivoire"),
        );
        let doc = AggregateOutputDocument::new("2.0.0", "test", 1, countries);

        let bytes = write_document(&path, &doc)?;
        let raw = fs::read_to_string(&path)?;
        assert_eq!(bytes as usize, raw.len());
        assert!(raw.contains("Côte d'Ivoire"));
        assert!(raw.contains("\n  \"version\": \"2.0.0\""));

        let back = AggregateOutputDocument::load(&path)?;
        assert_eq!(back, doc);
        assert_eq!(back.extracted_at.len(), 10);

        // only the output file remains; the temp file was renamed into place
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())?.collect();
        assert_eq!(entries.len(), 1);
        Ok(())
    }
}
