use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue};
use tracing::{debug, info};

use courseplan_core::CourseRecord;

use crate::parsers::soc::parse_catalog_json;
use crate::types::CatalogRequest;

pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("courseplan/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build http client")
}

/// Download and normalize one catalog snapshot.
pub async fn fetch_catalog(
    client: &reqwest::Client,
    base_url: &str,
    req: &CatalogRequest,
) -> Result<Vec<CourseRecord>> {
    let body = fetch_catalog_text(client, base_url, req).await?;
    let courses = parse_catalog_json(&body)?;
    info!(count = courses.len(), key = %req.cache_key(), "catalog fetched");
    Ok(courses)
}

/// Raw payload, for callers that cache the response before parsing it.
pub async fn fetch_catalog_text(
    client: &reqwest::Client,
    base_url: &str,
    req: &CatalogRequest,
) -> Result<String> {
    let url = req.url(base_url);
    debug!(%url, "fetching catalog");

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let resp = client
        .get(&url)
        .headers(headers)
        .send()
        .await
        .context("catalog request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("catalog error: {status} {txt}");
    }

    resp.text().await.context("read catalog body")
}
