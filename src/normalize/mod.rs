// src/normalize/mod.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d,]+\.?\d*").expect("number regex"));

/// Keys tried, in order, when an object carries no `text` of its own.
const FALLBACK_KEYS: [&str; 3] = ["total", "value", "note"];

/// Remove every `<...>` tag from `raw`.
pub fn strip_tags(raw: &str) -> String {
    TAG_RE.replace_all(raw, "").into_owned()
}

/// Pull a display string out of a Factbook value.
///
/// `{"text": "..."}` yields the tag-stripped, trimmed text (or `None` when
/// that leaves nothing). An object without `text` defers to the first of
/// `total`, `value`, `note` that is itself a text-bearing object. A bare
/// string comes back as-is. Everything else is `None`.
pub fn extract_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Object(map) => {
            if let Some(text) = map.get("text") {
                let cleaned = strip_tags(text.as_str()?);
                let cleaned = cleaned.trim();
                return (!cleaned.is_empty()).then(|| cleaned.to_string());
            }
            FALLBACK_KEYS
                .iter()
                .filter_map(|k| map.get(*k))
                .find(|v| v.as_object().is_some_and(|o| o.contains_key("text")))
                .and_then(|v| extract_text(Some(v)))
        }
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// First numeric token of [`extract_text`], thousands separators removed.
pub fn extract_number(value: Option<&Value>) -> Option<f64> {
    let text = extract_text(value)?;
    parse_leading_number(&text)
}

/// `"1,234.5 sq km"` → `1234.5`. No scale words are interpreted.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let token = NUMBER_RE.find(text)?.as_str().replace(',', "");
    token.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(v: Value) -> Option<String> {
        extract_text(Some(&v))
    }

    fn number(v: Value) -> Option<f64> {
        extract_number(Some(&v))
    }

    #[test]
    fn text_strips_tags_and_whitespace() {
        assert_eq!(
            text(json!({"text": "  <p>temperate; <strong>mild</strong></p> \n"})),
            Some("temperate; mild".to_string())
        );
    }

    #[test]
    fn text_empty_after_trim_is_none() {
        assert_eq!(text(json!({"text": "   "})), None);
        assert_eq!(text(json!({"text": "<br/>"})), None);
        assert_eq!(text(json!({"text": ""})), None);
    }

    #[test]
    fn text_falls_back_to_nested_keys_in_order() {
        let v = json!({
            "value": {"text": "from value"},
            "total": {"text": "from total"},
        });
        assert_eq!(text(v), Some("from total".to_string()));

        let v = json!({"total": "plain", "note": {"text": "from note"}});
        assert_eq!(text(v), Some("from note".to_string()));
    }

    #[test]
    fn text_plain_string_is_unchanged() {
        assert_eq!(text(json!("  <b>raw</b> ")), Some("  <b>raw</b> ".to_string()));
    }

    #[test]
    fn text_unrecognised_shapes_are_none() {
        assert_eq!(text(json!(42)), None);
        assert_eq!(text(json!(["a"])), None);
        assert_eq!(text(json!({"other": {"text": "x"}})), None);
        assert_eq!(text(json!({"text": 5})), None);
        assert_eq!(extract_text(None), None);
    }

    #[test]
    fn number_reads_leading_token() {
        assert_eq!(number(json!({"text": "1,234.5 sq km"})), Some(1234.5));
        assert_eq!(number(json!({"text": "$21.43 trillion (2019 est.)"})), Some(21.43));
        assert_eq!(number(json!("9,833,517 sq km")), Some(9_833_517.0));
    }

    #[test]
    fn number_without_digits_is_none() {
        assert_eq!(number(json!({"text": "none"})), None);
        assert_eq!(number(json!({"text": "a, b"})), None);
        assert_eq!(number(json!("")), None);
        assert_eq!(extract_number(None), None);
    }
}
