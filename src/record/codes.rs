// src/record/codes.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, info, warn};

use super::types::Variant;

/// Names for the handful of codes the 2021 pass knew about.
static NAME_TABLE: &[(&str, &str)] = &[
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
    ("ES", "Spain"),
    ("IT", "Italy"),
];

/// Name for `code` from the built-in table, echoing the code when unknown.
pub fn country_name(code: &str) -> String {
    NAME_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// One row of the country-codes dataset; only three columns matter.
#[derive(Debug, Deserialize)]
struct MappingEntry {
    #[serde(rename = "FIPS_GEC")]
    fips: Option<String>,
    #[serde(rename = "ISO_3166_2")]
    iso: Option<String>,
    #[serde(rename = "NAME.EN")]
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedCode {
    pub iso: String,
    pub name: Option<String>,
}

/// FIPS 10-4 (GEC) → ISO 3166-1 alpha-2 lookup.
#[derive(Debug, Clone, Default)]
pub struct CodeMappingTable {
    entries: HashMap<String, MappedCode>,
}

impl CodeMappingTable {
    /// Load the mapping array from `path`. A missing file is fatal to the run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading FIPS→ISO mapping {}", path.display()))?;
        let table = Self::from_json(&raw)
            .with_context(|| format!("parsing FIPS→ISO mapping {}", path.display()))?;
        if table.is_empty() {
            warn!(path = %path.display(), "FIPS→ISO mapping has no usable rows; every unit will be skipped");
        } else {
            info!(entries = table.len(), path = %path.display(), "loaded FIPS→ISO mappings");
        }
        Ok(table)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let rows: Vec<MappingEntry> = serde_json::from_str(raw)?;
        let mut entries = HashMap::new();
        for row in rows {
            match (non_empty(row.fips), non_empty(row.iso)) {
                (Some(fips), Some(iso)) => {
                    entries.insert(fips, MappedCode { iso, name: row.name });
                }
                _ => debug!("mapping row without FIPS or ISO code ignored"),
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, fips: &str) -> Option<&MappedCode> {
        self.entries.get(fips)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Identity a unit is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub code: String,
    pub fips_code: Option<String>,
    pub name: String,
}

/// How a unit identifier (the file stem) becomes an output code.
#[derive(Debug, Clone)]
pub enum CodeResolver {
    /// The uppercased identifier is both code and name.
    Uppercase,
    /// Uppercased identifier, name from the built-in table.
    NameTable,
    /// FIPS identifier mapped to its ISO code; unmapped units are skipped.
    Mapping(CodeMappingTable),
}

impl CodeResolver {
    /// Resolver for `variant`, loading the mapping file only when it is needed.
    pub fn for_variant(variant: Variant, mapping_file: &Path) -> Result<Self> {
        Ok(match variant {
            Variant::Basic => CodeResolver::Uppercase,
            Variant::Fixed => CodeResolver::NameTable,
            Variant::Iso => CodeResolver::Mapping(CodeMappingTable::load(mapping_file)?),
        })
    }

    /// `None` means the unit has no identity and must be skipped.
    pub fn resolve(&self, unit_id: &str) -> Option<Identity> {
        let upper = unit_id.to_uppercase();
        match self {
            CodeResolver::Uppercase => Some(Identity {
                name: upper.clone(),
                code: upper,
                fips_code: None,
            }),
            CodeResolver::NameTable => Some(Identity {
                name: country_name(&upper),
                code: upper,
                fips_code: None,
            }),
            CodeResolver::Mapping(table) => {
                let mapped = table.get(&upper)?;
                Some(Identity {
                    code: mapped.iso.clone(),
                    name: mapped.name.clone().unwrap_or_else(|| mapped.iso.clone()),
                    fips_code: Some(upper),
                })
            }
        }
    }
}
