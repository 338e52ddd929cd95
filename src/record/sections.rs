// src/record/sections.rs

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use super::types::FieldSet::{self, Basic, Fixed, Iso};
use super::types::Group;
use crate::extract::Extractor;
use crate::extract::Extractor as E;

/// One output field: where it comes from, how it is projected, and the first
/// field set that declares it.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub path: &'static [&'static str],
    pub extractor: Extractor,
    pub since: FieldSet,
}

const fn f(
    name: &'static str,
    path: &'static [&'static str],
    extractor: Extractor,
    since: FieldSet,
) -> FieldSpec {
    FieldSpec {
        name,
        path,
        extractor,
        since,
    }
}

static GEOGRAPHY: &[FieldSpec] = &[
    f("location", &["Location"], E::Text, Fixed),
    f("coordinates", &["Geographic coordinates"], E::Text, Fixed),
    f("area", &["Area"], E::Area, Basic),
    f("climate", &["Climate"], E::Text, Basic),
    f("terrain", &["Terrain"], E::Text, Basic),
    f("elevation", &["Elevation"], E::Elevation, Basic),
    f("natural_resources", &["Natural resources"], E::Text, Fixed),
    f("natural_hazards", &["Natural hazards"], E::Text, Iso),
    f("environment_issues", &["Environment - current issues"], E::Text, Iso),
];

static PEOPLE: &[FieldSpec] = &[
    f("population", &["Population"], E::Population, Basic),
    f("nationality", &["Nationality", "noun"], E::Text, Fixed),
    f("languages", &["Languages"], E::Languages, Basic),
    f("religions", &["Religions"], E::Religions, Basic),
    f("median_age", &["Median age", "total"], E::Text, Iso),
];

static GOVERNMENT: &[FieldSpec] = &[
    f("country_name", &["Country name", "conventional long form"], E::Text, Fixed),
    f("government_type", &["Government type"], E::Text, Basic),
    f("capital", &["Capital"], E::Capital, Basic),
    f("independence", &["Independence"], E::Text, Basic),
    f("national_holiday", &["National holiday"], E::Text, Fixed),
    f("administrative_divisions", &["Administrative divisions"], E::Text, Iso),
];

static ECONOMY: &[FieldSpec] = &[
    f("gdp", &["Real GDP (purchasing power parity)"], E::Gdp, Basic),
    f("gdp_per_capita", &["Real GDP per capita"], E::Number, Fixed),
    f("currency", &["Currency"], E::Currency, Basic),
    f("industries", &["Industries"], E::Text, Basic),
];

/// Every field the group can carry, in output order.
pub fn field_table(group: Group) -> &'static [FieldSpec] {
    match group {
        Group::Geography => GEOGRAPHY,
        Group::People => PEOPLE,
        Group::Government => GOVERNMENT,
        Group::Economy => ECONOMY,
    }
}

/// The fields `set` declares for `group`, in output order.
pub fn declared_fields(group: Group, set: FieldSet) -> impl Iterator<Item = &'static FieldSpec> {
    field_table(group).iter().filter(move |spec| spec.since <= set)
}

/// Follow `path` into `section`.
///
/// A missing key anywhere yields `None`; an intermediate value that exists
/// but is not an object is a malformed record.
pub fn lookup<'a>(section: &'a Map<String, Value>, path: &[&str]) -> Result<Option<&'a Value>> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(None);
    };
    let mut current = section.get(*first);
    let mut parent = *first;
    for key in rest {
        current = match current {
            None => return Ok(None),
            Some(Value::Object(obj)) => obj.get(*key),
            Some(_) => bail!("`{}` is not an object (looking up `{}`)", parent, key),
        };
        parent = *key;
    }
    Ok(current)
}

/// Project one raw section into its normalized group.
pub fn build_group(
    group: Group,
    section: &Map<String, Value>,
    set: FieldSet,
) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for spec in declared_fields(group, set) {
        let raw = lookup(section, spec.path)?;
        out.insert(spec.name.to_string(), spec.extractor.apply(raw));
    }
    Ok(out)
}
