// src/extract/fields.rs

use serde_json::Value;

use super::types::{Area, Capital, Currency, Elevation, Gdp, Population};
use crate::normalize::{extract_number, extract_text};

/// Currency markers accepted in GDP sub-key names.
const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

pub fn extract_area(value: Option<&Value>) -> Option<Area> {
    let obj = value?.as_object()?;
    // the mirror's key really is "total " with a trailing space
    let total = obj.get("total ").or_else(|| obj.get("total"));
    Some(Area {
        total_sq_km: extract_number(total),
        land_sq_km: extract_number(obj.get("land")),
        water_sq_km: extract_number(obj.get("water")),
        note: extract_text(obj.get("note")),
    })
}

pub fn extract_elevation(value: Option<&Value>) -> Option<Elevation> {
    let obj = value?.as_object()?;
    Some(Elevation {
        highest_point: extract_text(obj.get("highest point")),
        lowest_point: extract_text(obj.get("lowest point")),
        mean_elevation: extract_text(obj.get("mean elevation")),
    })
}

pub fn extract_population(value: Option<&Value>) -> Option<Population> {
    let value = value?;
    Some(match value.as_object() {
        Some(obj) => Population::Breakdown {
            total: extract_number(obj.get("total")),
            male: extract_number(obj.get("male")),
            female: extract_number(obj.get("female")),
        },
        None => Population::Bare {
            total: extract_number(Some(value)),
        },
    })
}

pub fn extract_capital(value: Option<&Value>) -> Option<Capital> {
    let value = value?;
    Some(match value.as_object() {
        Some(obj) => Capital::Detailed {
            name: extract_text(obj.get("name")),
            coordinates: extract_text(obj.get("geographic coordinates")),
            time_difference: extract_text(obj.get("time difference")),
        },
        None => Capital::Bare {
            name: extract_text(Some(value)),
        },
    })
}

/// GDP figure, preferring the first sub-key that names an amount.
///
/// The Factbook sometimes carries several figures under keys such as
/// `"$1.2 trillion (2019 est.)"`. The first key in document order that holds
/// a currency symbol or `billion`/`trillion` overrides the headline value.
pub fn extract_gdp(value: Option<&Value>) -> Option<Gdp> {
    let value = value?;
    let Some(obj) = value.as_object() else {
        return Some(Gdp::Bare {
            value: extract_number(Some(value)),
        });
    };

    let mut headline = extract_number(Some(value));
    if let Some((_, sub)) = obj.iter().find(|(k, _)| is_amount_key(k)) {
        headline = extract_number(Some(sub));
    }

    Some(Gdp::Annotated {
        value: headline,
        note: extract_text(obj.get("note")),
    })
}

fn is_amount_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    key.contains(&CURRENCY_SYMBOLS[..]) || lower.contains("billion") || lower.contains("trillion")
}

pub fn extract_currency(value: Option<&Value>) -> Option<Currency> {
    let value = value?;
    Some(match value.as_object() {
        Some(obj) => Currency::Detailed {
            name: extract_text(obj.get("name")),
            code: extract_text(obj.get("code")),
            symbol: extract_text(obj.get("symbol")),
        },
        None => Currency::Bare {
            name: extract_text(Some(value)),
        },
    })
}

/// Languages stay a single text blob; per-language entries are not parsed.
pub fn extract_languages(value: Option<&Value>) -> Option<String> {
    extract_text(value)
}

/// Religions stay a single text blob, same as languages.
pub fn extract_religions(value: Option<&Value>) -> Option<String> {
    extract_text(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn area_reads_total_with_trailing_space() {
        let v = json!({
            "total ": {"text": "9,833,517 sq km"},
            "land": {"text": "9,147,593 sq km"},
            "water": {"text": "685,924 sq km"},
            "note": {"text": "includes only the 50 states"},
        });
        let area = extract_area(Some(&v)).unwrap();
        assert_eq!(area.total_sq_km, Some(9_833_517.0));
        assert_eq!(area.land_sq_km, Some(9_147_593.0));
        assert_eq!(area.water_sq_km, Some(685_924.0));
        assert_eq!(area.note.as_deref(), Some("includes only the 50 states"));
    }

    #[test]
    fn area_non_object_is_none() {
        assert_eq!(extract_area(Some(&json!("big"))), None);
        assert_eq!(extract_area(None), None);
    }

    #[test]
    fn elevation_fields() {
        let v = json!({
            "highest point": {"text": "Denali 6,190 m"},
            "lowest point": {"text": "Death Valley -86 m"},
        });
        let e = extract_elevation(Some(&v)).unwrap();
        assert_eq!(e.highest_point.as_deref(), Some("Denali 6,190 m"));
        assert_eq!(e.lowest_point.as_deref(), Some("Death Valley -86 m"));
        assert_eq!(e.mean_elevation, None);
    }

    #[test]
    fn population_bare_and_breakdown() {
        let bare = extract_population(Some(&json!("334,914,895 (2023 est.)"))).unwrap();
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"total": 334914895.0}));

        let full = extract_population(Some(&json!({
            "total": {"text": "1,000"},
            "male": {"text": "480"},
        })))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&full).unwrap(),
            json!({"total": 1000.0, "male": 480.0, "female": null})
        );
    }

    #[test]
    fn capital_shapes() {
        let bare = extract_capital(Some(&json!("Paris"))).unwrap();
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"name": "Paris"}));

        let full = extract_capital(Some(&json!({
            "name": {"text": "Washington, DC"},
            "geographic coordinates": {"text": "38 53 N, 77 02 W"},
            "time difference": {"text": "UTC-5"},
        })))
        .unwrap();
        assert_eq!(
            full,
            Capital::Detailed {
                name: Some("Washington, DC".into()),
                coordinates: Some("38 53 N, 77 02 W".into()),
                time_difference: Some("UTC-5".into()),
            }
        );
    }

    #[test]
    fn gdp_takes_first_amount_key_in_document_order() {
        let raw = r#"{
            "Real GDP (purchasing power parity) 2020": {"text": "$100 (2020 est.)"},
            "$2.5 trillion (2019 est.)": {"text": "2,500 billion"},
            "$1.9 billion (2018 est.)": {"text": "1.9"},
            "note": {"text": "data are in 2017 dollars"}
        }"#;
        let v: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            extract_gdp(Some(&v)).unwrap(),
            Gdp::Annotated {
                value: Some(2500.0),
                note: Some("data are in 2017 dollars".into()),
            }
        );
    }

    #[test]
    fn gdp_amount_key_match_is_case_insensitive() {
        let raw = r#"{"Reported in BILLION USD": {"text": "42"}, "other": {"text": "7"}}"#;
        let v: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            extract_gdp(Some(&v)).unwrap(),
            Gdp::Annotated {
                value: Some(42.0),
                note: None,
            }
        );
    }

    #[test]
    fn gdp_without_amount_key_uses_headline() {
        let v = json!({"text": "$21.43 trillion"});
        assert_eq!(
            extract_gdp(Some(&v)).unwrap(),
            Gdp::Annotated {
                value: Some(21.43),
                note: None,
            }
        );

        let bare = extract_gdp(Some(&json!("$5 billion"))).unwrap();
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"value": 5.0}));
    }

    #[test]
    fn currency_shapes() {
        let bare = extract_currency(Some(&json!("euro"))).unwrap();
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"name": "euro"}));

        let full = extract_currency(Some(&json!({"name": {"text": "US dollar"}, "code": "USD"}))).unwrap();
        assert_eq!(
            serde_json::to_value(&full).unwrap(),
            json!({"name": "US dollar", "code": "USD", "symbol": null})
        );
    }

    #[test]
    fn languages_and_religions_flatten_to_text() {
        let v = json!({
            "text": "English 78.2%, <em>Spanish</em> 13.4%",
            "language": [{"name": "English", "percent": 78.2}],
        });
        assert_eq!(
            extract_languages(Some(&v)).as_deref(),
            Some("English 78.2%, Spanish 13.4%")
        );
        assert_eq!(extract_religions(Some(&json!({"religion": []}))), None);
    }
}
