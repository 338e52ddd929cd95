pub mod fields;
pub mod types;

pub use fields::{
    extract_area, extract_capital, extract_currency, extract_elevation, extract_gdp,
    extract_languages, extract_population, extract_religions,
};
pub use types::{Area, Capital, Currency, Elevation, Gdp, Population};

use serde::Serialize;
use serde_json::Value;

use crate::normalize::{extract_number, extract_text};

/// Which projection a record field applies to its raw sub-value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Extractor {
    Text,
    Number,
    Area,
    Elevation,
    Population,
    Capital,
    Gdp,
    Currency,
    Languages,
    Religions,
}

impl Extractor {
    /// Run the projection and render it as a JSON value (`null` when absent).
    pub fn apply(self, raw: Option<&Value>) -> Value {
        match self {
            Extractor::Text => to_json(extract_text(raw)),
            Extractor::Number => to_json(extract_number(raw)),
            Extractor::Area => to_json(extract_area(raw)),
            Extractor::Elevation => to_json(extract_elevation(raw)),
            Extractor::Population => to_json(extract_population(raw)),
            Extractor::Capital => to_json(extract_capital(raw)),
            Extractor::Gdp => to_json(extract_gdp(raw)),
            Extractor::Currency => to_json(extract_currency(raw)),
            Extractor::Languages => to_json(extract_languages(raw)),
            Extractor::Religions => to_json(extract_religions(raw)),
        }
    }
}

fn to_json<T: Serialize>(v: Option<T>) -> Value {
    v.and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}
