//! Reference source backed by the Contentstack Content Management API.
//!
//! Upward references come from the entry `references` endpoint, bodies from
//! the single-entry endpoint. Requests are blocking and are never retried.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use ureq::http::StatusCode;

use crate::config::CrawlConfig;
use crate::errors::{RefCrawlError, Result};
use crate::source::ReferenceSource;
use crate::types::EntryRef;

/// Reference source talking to a Contentstack stack over HTTPS.
pub struct ContentstackSource {
    agent: ureq::Agent,
    api_host: String,
    api_key: String,
    authorization_token: String,
}

#[derive(Debug, Deserialize)]
struct ReferencesResponse {
    #[serde(default)]
    references: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    #[serde(default)]
    entry: Option<Value>,
}

impl ContentstackSource {
    /// Creates a source from the API settings in `config`.
    ///
    /// Fails with a config error if the host or credentials are missing.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        config.validate_credentials()?;

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_config),
            api_host: config.api_host.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            authorization_token: config.authorization_token.clone(),
        })
    }

    /// URL listing the entries that reference the given entry.
    pub fn references_url(&self, entry_uid: &str, content_type_uid: &str, locale: &str) -> String {
        format!(
            "https://{}/v3/content_types/{}/entries/{}/references?locale={}",
            self.api_host, content_type_uid, entry_uid, locale
        )
    }

    /// URL of the given entry's body.
    pub fn entry_url(&self, entry_uid: &str, content_type_uid: &str, locale: &str) -> String {
        format!(
            "https://{}/v3/content_types/{}/entries/{}?locale={}",
            self.api_host, content_type_uid, entry_uid, locale
        )
    }

    /// Issues an authenticated GET and returns the response text.
    ///
    /// Transport failures and non-success statuses become fetch errors.
    fn get(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "GET");

        let mut response = self
            .agent
            .get(url)
            .header("Content-Type", "application/json")
            .header("api_key", &self.api_key)
            .header("authorization", &self.authorization_token)
            .call()
            .map_err(|e| {
                tracing::warn!(url, error = %e, "request failed");
                RefCrawlError::Fetch {
                    message: format!("request failed: {}", e),
                    endpoint: url.to_string(),
                }
            })?;

        check_status(response.status(), url)?;

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| RefCrawlError::Fetch {
                message: format!("failed to read response: {}", e),
                endpoint: url.to_string(),
            })
    }
}

impl ReferenceSource for ContentstackSource {
    fn upward_references(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        locale: &str,
    ) -> Result<Vec<EntryRef>> {
        let url = self.references_url(entry_uid, content_type_uid, locale);
        let text = self.get(&url)?;
        parse_references_response(&text, &url)
    }

    fn entry_body(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        locale: &str,
    ) -> Result<Option<Value>> {
        let url = self.entry_url(entry_uid, content_type_uid, locale);
        let text = self.get(&url)?;
        parse_entry_response(&text, &url)
    }
}

/// Parses a `references` endpoint response.
///
/// A missing or null `references` field means the entry has no referrers.
/// Items without string `entry_uid` and `content_type_uid` are skipped.
pub fn parse_references_response(text: &str, endpoint: &str) -> Result<Vec<EntryRef>> {
    let parsed: ReferencesResponse =
        serde_json::from_str(text).map_err(|e| invalid_json(e, endpoint))?;
    Ok(parsed
        .references
        .unwrap_or_default()
        .iter()
        .filter_map(|item| {
            let entry = as_referrer(item);
            if entry.is_none() {
                tracing::warn!(endpoint, item = %item, "skipping malformed reference");
            }
            entry
        })
        .collect())
}

fn as_referrer(item: &Value) -> Option<EntryRef> {
    let entry_uid = item.get("entry_uid")?.as_str()?;
    let content_type_uid = item.get("content_type_uid")?.as_str()?;
    Some(EntryRef::new(entry_uid, content_type_uid))
}

/// Parses a single-entry endpoint response.
///
/// A missing or null `entry` field means the entry has no body.
pub fn parse_entry_response(text: &str, endpoint: &str) -> Result<Option<Value>> {
    let parsed: EntryResponse =
        serde_json::from_str(text).map_err(|e| invalid_json(e, endpoint))?;
    Ok(parsed.entry.filter(|entry| !entry.is_null()))
}

/// Turns a non-success status into a fetch error.
pub fn check_status(status: StatusCode, endpoint: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(endpoint, status = status.as_u16(), "non-success status");
    Err(RefCrawlError::Fetch {
        message: format!(
            "unexpected status {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string(),
        endpoint: endpoint.to_string(),
    })
}

fn invalid_json(e: serde_json::Error, endpoint: &str) -> RefCrawlError {
    RefCrawlError::Fetch {
        message: format!("invalid JSON response: {}", e),
        endpoint: endpoint.to_string(),
    }
}
