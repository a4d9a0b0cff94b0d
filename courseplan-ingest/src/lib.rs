//! courseplan-ingest: schedule-of-classes download and normalization into catalog records.

pub mod fetch;
pub mod parsers;
pub mod types;

pub use fetch::{build_client, fetch_catalog, fetch_catalog_text};
pub use parsers::soc::{normalize_course, parse_catalog_json};
pub use types::{CatalogRequest, DEFAULT_BASE_URL, Term};
