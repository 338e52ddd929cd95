// src/config.rs

use std::time::Duration;

/// Region directories of the `factbook.json` mirror used by the 2021 passes.
pub static REGIONS: &[&str] = &[
    "africa",
    "antarctica",
    "australia-oceania",
    "central-america-n-caribbean",
    "central-asia",
    "east-n-southeast-asia",
    "europe",
    "middle-east",
    "north-america",
    "south-america",
    "south-asia",
];

/// The first offline pass also walked the two non-country groupings.
pub static REGIONS_WITH_EXTRAS: &[&str] = &[
    "africa",
    "antarctica",
    "australia-oceania",
    "central-america-n-caribbean",
    "central-asia",
    "east-n-southeast-asia",
    "europe",
    "middle-east",
    "north-america",
    "oceans",
    "south-america",
    "south-asia",
    "world",
];

/// Directory name of the cloned mirror under the data dir.
pub const MIRROR_DIR: &str = "factbook.json";
pub const DEFAULT_DATA_DIR: &str = "data/cia_factbook";
pub const DEFAULT_MAPPING_FILE: &str = "scripts/fips_iso_mapping.json";

pub const BASE_URL: &str = "https://www.cia.gov/the-world-factbook";
/// Path prefix the site uses for its own absolute links.
pub const SITE_PREFIX: &str = "/the-world-factbook";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const SCRAPE_DELAY_MS: u64 = 2000;
pub const SCRAPE_OUTPUT_FILE: &str = "cia_factbook_2025.json";
pub const SCRAPE_VERSION: &str = "2.0.0";
pub const SCRAPE_SOURCE: &str = "CIA World Factbook (scraped)";

pub const DEFAULT_PORT: u16 = 8888;
pub const VIEWER_PAGE: &str = "globe.html";
pub const MAP_PAGE: &str = "index.html";

/// Default log filter when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";
