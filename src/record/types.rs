// src/record/types.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{REGIONS, REGIONS_WITH_EXTRAS};

/// One normalized country as written into the aggregate document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedCountryRecord {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fips_code: Option<String>,
    pub name: String,
    pub geography: Map<String, Value>,
    pub people: Map<String, Value>,
    pub government: Map<String, Value>,
    pub economy: Map<String, Value>,
}

impl NormalizedCountryRecord {
    /// A record with every group present and empty.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            fips_code: None,
            name: name.into(),
            geography: Map::new(),
            people: Map::new(),
            government: Map::new(),
            economy: Map::new(),
        }
    }

    pub fn group(&self, group: Group) -> &Map<String, Value> {
        match group {
            Group::Geography => &self.geography,
            Group::People => &self.people,
            Group::Government => &self.government,
            Group::Economy => &self.economy,
        }
    }

    pub fn group_mut(&mut self, group: Group) -> &mut Map<String, Value> {
        match group {
            Group::Geography => &mut self.geography,
            Group::People => &mut self.people,
            Group::Government => &mut self.government,
            Group::Economy => &mut self.economy,
        }
    }
}

/// The four output groups, each fed by one Factbook section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    Geography,
    People,
    Government,
    Economy,
}

impl Group {
    pub const ALL: [Group; 4] = [
        Group::Geography,
        Group::People,
        Group::Government,
        Group::Economy,
    ];

    /// Section heading in the source data.
    pub fn section(&self) -> &'static str {
        match self {
            Group::Geography => "Geography",
            Group::People => "People and Society",
            Group::Government => "Government",
            Group::Economy => "Economy",
        }
    }
}

/// Nested field sets; a later set declares every field of the earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldSet {
    Basic,
    Fixed,
    Iso,
}

/// The three extraction passes, expressed as configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Variant {
    /// First offline pass over the 2021 mirror; codes echo the file stem.
    Basic,
    /// Corrected 2021 pass with a small built-in name table.
    Fixed,
    /// Current mirror with FIPS codes mapped to ISO 3166 codes.
    Iso,
}

impl Variant {
    pub fn field_set(&self) -> FieldSet {
        match self {
            Variant::Basic => FieldSet::Basic,
            Variant::Fixed => FieldSet::Fixed,
            Variant::Iso => FieldSet::Iso,
        }
    }

    pub fn regions(&self) -> &'static [&'static str] {
        match self {
            Variant::Basic => REGIONS_WITH_EXTRAS,
            Variant::Fixed | Variant::Iso => REGIONS,
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            Variant::Basic => "1.0.0",
            Variant::Fixed => "2.0.0",
            Variant::Iso => "3.0.0",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Variant::Basic => "CIA World Factbook via factbook.json (2021)",
            Variant::Fixed => "CIA World Factbook (factbook.json 2021)",
            Variant::Iso => "CIA World Factbook (factbook.json, updated weekly)",
        }
    }

    pub fn output_file(&self) -> &'static str {
        match self {
            Variant::Basic => "cia_factbook.json",
            Variant::Fixed => "cia_factbook_2021_complete.json",
            Variant::Iso => "cia_factbook_2025_iso.json",
        }
    }
}

/// Result of building one unit that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Built(NormalizedCountryRecord),
    /// No identity could be resolved; neither a success nor an error.
    Skipped { unit: String, reason: String },
}
