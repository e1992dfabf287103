use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use super::USER_AGENT;

#[derive(Debug, Deserialize)]
struct FsfRecord {
    #[serde(default)]
    tags: Vec<String>,
}

/// Fetch the FSF classification tags for a license from the SPDX FSF API.
///
/// Returns `Ok(None)` when the FSF has no record for the identifier.
pub async fn fetch_tags(client: &Client, base: &str, id: &str) -> Result<Option<Vec<String>>> {
    let url = format!("{}{}.json", base, id);
    tracing::debug!(url = %url, "GET");

    let response = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    let record: FsfRecord = response.json().await?;
    Ok(Some(record.tags))
}
