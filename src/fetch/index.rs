// src/fetch/index.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::trace;
use url::Url;

use super::page::element_text;
use crate::config::SITE_PREFIX;

static COUNTRY_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(r#"a[href^="{}/countries/"]"#, SITE_PREFIX))
        .expect("CSS selector for country links should be valid")
});

/// One country entry discovered on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryLink {
    pub name: String,
    pub url: Url,
    pub slug: String,
}

/// Country links of the index page, first occurrence per slug, page order.
///
/// `base_url` is the site root the links are resolved against; the site's own
/// path prefix is stripped from each `href` before appending it.
pub fn parse_country_list(html: &str, base_url: &str) -> Vec<CountryLink> {
    let doc = Html::parse_document(html);
    let base = base_url.trim_end_matches('/');
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for a in doc.select(&COUNTRY_LINK) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let name = element_text(a);
        if name.chars().count() <= 1 {
            continue;
        }
        let Some(slug) = slug_of(href) else {
            continue;
        };
        let path = href.strip_prefix(SITE_PREFIX).unwrap_or(href);
        let Ok(url) = Url::parse(&format!("{}{}", base, path)) else {
            trace!(href, "unresolvable country link");
            continue;
        };
        if seen.insert(slug.clone()) {
            out.push(CountryLink { name, url, slug });
        }
    }
    out
}

/// Last non-empty path segment: `/the-world-factbook/countries/france/` → `france`.
fn slug_of(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/')
        .find(|s| !s.is_empty())
        .filter(|s| *s != "countries")
        .map(str::to_string)
}
