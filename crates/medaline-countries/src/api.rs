//! REST Countries reference fetch.
//!
//! One fixed three-attempt sequence: the field-filtered URL first, the full
//! payload as fallback, then the field-filtered URL once more, with a fixed
//! pause before each retry. Decode failures retry like transport failures
//! (a truncated body looks the same either way).

use std::time::Duration;

use anyhow::{Context, Result};
use medaline_core::SHARED_RUNTIME;

use crate::index::CountryRecord;

/// Fields the index needs; the filtered payload is a fraction of the full one.
const FIELDS: &str = "name,cca3,cioc,population";

/// Pause before each retry.
const RETRY_PAUSE: Duration = Duration::from_millis(600);

/// Per-attempt timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Attempt sequence: filtered, full fallback, filtered again.
pub fn attempt_urls(base_url: &str) -> [String; 3] {
    let filtered = format!("{base_url}?fields={FIELDS}");
    [filtered.clone(), base_url.to_string(), filtered]
}

/// Fetch and decode the country reference payload.
pub fn fetch_countries(base_url: &str) -> Result<Vec<CountryRecord>> {
    SHARED_RUNTIME
        .handle()
        .block_on(async { fetch_countries_async(base_url).await })
}

async fn fetch_countries_async(base_url: &str) -> Result<Vec<CountryRecord>> {
    let client = medaline_core::http_client();
    let urls = attempt_urls(base_url);

    let mut last_err = None;
    for (attempt, url) in urls.iter().enumerate() {
        if attempt > 0 {
            log::info!(
                "Retrying country reference fetch (attempt {}/{}) after {RETRY_PAUSE:?}",
                attempt + 1,
                urls.len()
            );
            tokio::time::sleep(RETRY_PAUSE).await;
        }

        match tokio::time::timeout(FETCH_TIMEOUT, async {
            client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .context("failed to fetch country reference")?
                .text()
                .await
                .context("failed to read country reference body")
        })
        .await
        {
            Ok(Ok(body)) => match decode_payload(&body) {
                Ok(records) => {
                    log::debug!("Country reference: {} entries from {url}", records.len());
                    return Ok(records);
                }
                Err(e) => {
                    log::warn!("Country reference decode failed: {e:#}");
                    last_err = Some(e);
                }
            },
            Ok(Err(e)) => {
                log::warn!("Country reference fetch failed: {e:#}");
                last_err = Some(e);
            }
            Err(_) => {
                log::warn!("Country reference fetch timed out ({FETCH_TIMEOUT:?})");
                last_err = Some(anyhow::anyhow!(
                    "country reference fetch timed out after {FETCH_TIMEOUT:?}"
                ));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("country reference fetch failed")))
}

/// Decode the JSON array, tolerating unknown fields per entry.
fn decode_payload(body: &str) -> Result<Vec<CountryRecord>> {
    serde_json::from_str(body).context("country reference payload was not a JSON country array")
}
