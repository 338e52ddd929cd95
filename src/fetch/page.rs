// src/fetch/page.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use tracing::trace;

use crate::record::{declared_fields, FieldSet, Group, NormalizedCountryRecord};

static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").expect("h2 selector"));

/// Field a sub-heading feeds when it contains every needle.
#[derive(Debug, Clone, Copy)]
pub struct HeadingRule {
    pub field: &'static str,
    pub needles: &'static [&'static str],
}

impl HeadingRule {
    /// `heading` is expected lowercased.
    pub fn matches(&self, heading: &str) -> bool {
        self.needles.iter().all(|n| heading.contains(n))
    }
}

const fn rule(field: &'static str, needles: &'static [&'static str]) -> HeadingRule {
    HeadingRule { field, needles }
}

static GEOGRAPHY_RULES: &[HeadingRule] = &[
    rule("area", &["area"]),
    rule("climate", &["climate"]),
    rule("terrain", &["terrain"]),
    rule("elevation", &["elevation"]),
];

static PEOPLE_RULES: &[HeadingRule] = &[
    rule("population", &["population"]),
    rule("languages", &["language"]),
    rule("religions", &["religion"]),
];

static GOVERNMENT_RULES: &[HeadingRule] = &[
    rule("government_type", &["government type"]),
    rule("capital", &["capital"]),
    rule("independence", &["independence"]),
];

static ECONOMY_RULES: &[HeadingRule] = &[
    rule("gdp", &["gdp", "real"]),
    rule("industries", &["industries"]),
    rule("currency", &["currency"]),
];

/// Ordered dispatch table for one section; the first matching rule wins.
pub fn heading_rules(group: Group) -> &'static [HeadingRule] {
    match group {
        Group::Geography => GEOGRAPHY_RULES,
        Group::People => PEOPLE_RULES,
        Group::Government => GOVERNMENT_RULES,
        Group::Economy => ECONOMY_RULES,
    }
}

/// Whitespace-normalized text of `el`, text nodes joined by single spaces.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// First `h2` whose text contains `section`, case-insensitively.
fn find_section<'a>(doc: &'a Html, section: &str) -> Option<ElementRef<'a>> {
    let needle = section.to_lowercase();
    doc.select(&H2)
        .find(|h| element_text(*h).to_lowercase().contains(&needle))
}

/// Collect the `h3`/value pairs between a section heading and the next `h2`.
fn section_group(doc: &Html, group: Group) -> Map<String, Value> {
    let mut out = Map::new();
    for spec in declared_fields(group, FieldSet::Basic) {
        out.insert(spec.name.to_string(), Value::Null);
    }

    let Some(heading) = find_section(doc, group.section()) else {
        trace!(section = group.section(), "section heading not found");
        return out;
    };

    let rules = heading_rules(group);
    let mut current = next_element(heading);
    while let Some(el) = current {
        match el.value().name() {
            "h2" => break,
            "h3" => {
                let label = element_text(el).to_lowercase();
                let rule = rules.iter().find(|r| r.matches(&label));
                if let (Some(rule), Some(value)) = (rule, next_element(el)) {
                    // later sub-headings overwrite earlier ones for the same field
                    trace!(field = rule.field, label = %label, "matched");
                    out.insert(rule.field.to_string(), Value::String(element_text(value)));
                }
            }
            _ => {}
        }
        current = next_element(el);
    }
    out
}

/// Build a record from one country detail page.
///
/// Values are the raw display text of the last sub-heading matching each
/// field; unmatched fields stay `null` and sections the page lacks keep their
/// declared fields.
pub fn parse_country_page(html: &str, code: &str, name: &str) -> NormalizedCountryRecord {
    let doc = Html::parse_document(html);
    let mut record = NormalizedCountryRecord::new(code, name);
    for group in Group::ALL {
        *record.group_mut(group) = section_group(&doc, group);
    }
    record
}
