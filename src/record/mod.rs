pub mod codes;
pub mod sections;
pub mod types;

pub use codes::{country_name, CodeMappingTable, CodeResolver, Identity};
pub use sections::{build_group, declared_fields, field_table, lookup, FieldSpec};
pub use types::{BuildOutcome, FieldSet, Group, NormalizedCountryRecord, Variant};

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use tracing::trace;

/// Turns one raw Factbook document into a [`NormalizedCountryRecord`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    variant: Variant,
    resolver: CodeResolver,
}

impl RecordBuilder {
    pub fn new(variant: Variant, resolver: CodeResolver) -> Self {
        Self { variant, resolver }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Build the record for `unit_id` (the source file stem).
    ///
    /// An unresolvable identifier is `Skipped`; a document whose shape cannot
    /// be walked is an `Err`. Sections absent from `raw` leave their group
    /// empty.
    pub fn build(&self, unit_id: &str, raw: &Value) -> Result<BuildOutcome> {
        let Some(identity) = self.resolver.resolve(unit_id) else {
            return Ok(BuildOutcome::Skipped {
                unit: unit_id.to_uppercase(),
                reason: format!("no ISO mapping for FIPS code {}", unit_id.to_uppercase()),
            });
        };

        let doc = raw
            .as_object()
            .ok_or_else(|| anyhow!("top level of {} is not an object", unit_id))?;

        let mut record = NormalizedCountryRecord::new(identity.code, identity.name);
        record.fips_code = identity.fips_code;

        let set = self.variant.field_set();
        for group in Group::ALL {
            let Some(section) = doc.get(group.section()) else {
                trace!(unit = unit_id, section = group.section(), "section absent");
                continue;
            };
            let Some(section) = section.as_object() else {
                bail!("section `{}` of {} is not an object", group.section(), unit_id);
            };
            *record.group_mut(group) = build_group(group, section, set)?;
        }

        Ok(BuildOutcome::Built(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Geography": {
                "Location": {"text": "Western Europe"},
                "Area": {
                    "total ": {"text": "643,801 sq km"},
                    "land": {"text": "640,427 sq km"},
                    "water": {"text": "3,374 sq km"}
                },
                "Climate": {"text": "generally cool winters"}
            },
            "People and Society": {
                "Population": {"total": {"text": "68,521,974 (2023 est.)"}},
                "Nationality": {"noun": {"text": "Frenchman(men)"}},
                "Languages": {"text": "French (official) 100%"}
            },
            "Government": {
                "Country name": {"conventional long form": {"text": "French Republic"}},
                "Capital": {"name": {"text": "Paris"}}
            },
            "Economy": {
                "Currency": {"name": {"text": "euros (EUR)"}}
            }
        })
    }

    fn built(outcome: BuildOutcome) -> NormalizedCountryRecord {
        match outcome {
            BuildOutcome::Built(r) => r,
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn fixed_variant_builds_full_record() {
        let builder = RecordBuilder::new(Variant::Fixed, CodeResolver::NameTable);
        let rec = built(builder.build("fr", &sample()).unwrap());

        assert_eq!(rec.code, "FR");
        assert_eq!(rec.name, "France");
        assert_eq!(rec.fips_code, None);
        assert_eq!(rec.geography["location"], json!("Western Europe"));
        assert_eq!(rec.geography["area"]["total_sq_km"], json!(643801.0));
        assert_eq!(rec.geography["natural_resources"], Value::Null);
        assert!(!rec.geography.contains_key("natural_hazards"));
        assert_eq!(
            rec.people["population"],
            json!({"total": 68521974.0, "male": null, "female": null})
        );
        assert_eq!(rec.people["nationality"], json!("Frenchman(men)"));
        assert_eq!(rec.government["country_name"], json!("French Republic"));
        assert_eq!(
            rec.government["capital"],
            json!({"name": "Paris", "coordinates": null, "time_difference": null})
        );
        assert_eq!(
            rec.economy["currency"],
            json!({"name": "euros (EUR)", "code": null, "symbol": null})
        );
        assert_eq!(rec.economy["gdp"], Value::Null);
    }

    #[test]
    fn missing_section_yields_empty_group() {
        let builder = RecordBuilder::new(Variant::Basic, CodeResolver::Uppercase);
        let raw = json!({"Economy": {"Industries": {"text": "tourism"}}});
        let rec = built(builder.build("xx", &raw).unwrap());
        assert!(rec.geography.is_empty());
        assert!(rec.people.is_empty());
        assert_eq!(rec.economy["industries"], json!("tourism"));

        let serialized = serde_json::to_value(&rec).unwrap();
        assert_eq!(serialized["geography"], json!({}));
        assert!(serialized.get("fips_code").is_none());
    }

    #[test]
    fn iso_variant_skips_unmapped_units() {
        let table = CodeMappingTable::from_json(
            r#"[{"FIPS_GEC": "FR", "ISO_3166_2": "FR", "NAME.EN": "France"}]"#,
        )
        .unwrap();
        let builder = RecordBuilder::new(Variant::Iso, CodeResolver::Mapping(table));

        let rec = built(builder.build("fr", &sample()).unwrap());
        assert_eq!(rec.fips_code.as_deref(), Some("FR"));
        assert!(rec.people.contains_key("median_age"));

        match builder.build("od", &sample()).unwrap() {
            BuildOutcome::Skipped { unit, .. } => assert_eq!(unit, "OD"),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn gdp_heuristic_follows_document_order() {
        let raw: Value = serde_json::from_str(
            r#"{"Economy": {"Real GDP (purchasing power parity)": {
                "$3.1 trillion (2021 est.)": {"text": "3.1"},
                "$2.9 trillion (2020 est.)": {"text": "2.9"}
            }}}"#,
        )
        .unwrap();
        let builder = RecordBuilder::new(Variant::Fixed, CodeResolver::NameTable);
        let rec = built(builder.build("fr", &raw).unwrap());
        assert_eq!(rec.economy["gdp"]["value"], json!(3.1));
    }

    #[test]
    fn malformed_shapes_are_errors() {
        let builder = RecordBuilder::new(Variant::Fixed, CodeResolver::NameTable);
        assert!(builder.build("fr", &json!(["not", "a", "record"])).is_err());
        assert!(builder.build("fr", &json!({"Geography": "flat"})).is_err());
        assert!(builder
            .build("fr", &json!({"People and Society": {"Nationality": "French"}}))
            .is_err());
    }
}
