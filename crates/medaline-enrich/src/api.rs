//! Chat-completions client for the enrichment service.
//!
//! One blocking call per chunk. There is no retry here: a failed request
//! aborts the stage, and the fixed pause between chunks lives in the
//! runner, not the client.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use medaline_core::SHARED_RUNTIME;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::items::EnrichmentItem;
use crate::parser::snippet;

/// Per-request timeout; a 25-item batch can take a while to generate.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Low temperature: results are merged positionally and must stay
/// schema-shaped.
const TEMPERATURE: f32 = 0.2;

/// Completion token cap per request.
const MAX_TOKENS: u32 = 700;

const SYSTEM_PROMPT: &str = "You enrich sports records. Return STRICT JSON only. \
For each input item, produce:\n\
 - athlete_archetype: a short, vivid label (e.g. 'snappy sprinter') that defines them as an athlete.\n\
 - health_points: integer HP (about 50 base, +25 per medal, capped near 200).\n\
Return a JSON object {\"items\": [...]} with exactly one result per input item, in input order. \
Do not add commentary or explanation.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Send one batch of items; returns the assistant's raw text content.
pub fn complete(config: &Config, items: &[EnrichmentItem]) -> Result<String> {
    SHARED_RUNTIME
        .handle()
        .block_on(async { complete_async(config, items).await })
}

async fn complete_async(config: &Config, items: &[EnrichmentItem]) -> Result<String> {
    let request = build_request(config, items)?;

    let response = medaline_core::http_client()
        .post(&config.api_url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .json(&request)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .context("enrichment request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!(
            "enrichment service returned HTTP {}: {}",
            status.as_u16(),
            snippet(&body)
        );
    }

    let decoded: ChatResponse = response
        .json()
        .await
        .context("enrichment response was not valid JSON")?;
    let choice = decoded
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("enrichment response contained no choices"))?;
    choice
        .message
        .content
        .ok_or_else(|| anyhow!("enrichment response contained no message content"))
}

fn build_request<'a>(config: &'a Config, items: &[EnrichmentItem]) -> Result<ChatRequest<'a>> {
    let user_payload = serde_json::json!({ "items": items });
    Ok(ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: serde_json::to_string(&user_payload)
                    .context("failed to encode items payload")?,
            },
        ],
        temperature: TEMPERATURE,
        stream: false,
        max_tokens: MAX_TOKENS,
    })
}
