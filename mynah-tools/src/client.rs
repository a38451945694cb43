//! HTTP client for the Mynah external API.
//!
//! One `MynahClient` is constructed at startup and shared (`Arc`) by every
//! tool. It owns the three jobs the rest of the crate relies on:
//!
//! - attaching the static `X-Api-Key` credential to every request,
//! - classifying every failure into one [`ApiError`] variant, so each failure
//!   class has a single message everywhere,
//! - following `next_cursor` pagination up to a hard page ceiling.
//!
//! No retries, no caching. A failed page fetch aborts the whole aggregation.

use std::time::Duration;

use mynah_core::config::MynahConfig;
use mynah_core::error::{ApiError, ConfigError};
use mynah_core::models::{
    CreateWebhookRequest, Cursor, Meeting, Page, RecordingSummary, RecordingTranscript, Team,
    TeamMember, Webhook,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Hard ceiling on pages fetched per aggregation.
///
/// A safety bound against a remote that keeps handing out cursors, not a
/// user-facing limit.
pub const MAX_PAGES: usize = 10;

/// Filters accepted by the meetings list endpoint.
///
/// Array-valued filters go on the wire as repeated `key[]=value` pairs; the
/// inclusion flags control which optional meeting sections the remote
/// attaches.
#[derive(Debug, Clone, Default)]
pub struct MeetingFilters {
    /// ISO-8601 lower bound on `created_at`, passed through verbatim.
    pub created_after: Option<String>,
    /// ISO-8601 upper bound on `created_at`, passed through verbatim.
    pub created_before: Option<String>,
    /// Invitee email filters.
    pub calendar_invitees: Vec<String>,
    /// Recorder email filters.
    pub recorded_by: Vec<String>,
    /// Team name filters.
    pub teams: Vec<String>,
    pub include_transcript: bool,
    pub include_summary: bool,
    pub include_action_items: bool,
    pub include_crm_matches: bool,
}

impl MeetingFilters {
    /// Query pairs in wire order. Keys for array filters carry literal
    /// brackets; only values get percent-encoded later.
    fn to_query(&self, cursor: Option<&Cursor>) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(created_after) = &self.created_after {
            query.push(("created_after".to_string(), created_after.clone()));
        }
        if let Some(created_before) = &self.created_before {
            query.push(("created_before".to_string(), created_before.clone()));
        }
        for email in &self.calendar_invitees {
            query.push(("calendar_invitees[]".to_string(), email.clone()));
        }
        for email in &self.recorded_by {
            query.push(("recorded_by[]".to_string(), email.clone()));
        }
        for team in &self.teams {
            query.push(("teams[]".to_string(), team.clone()));
        }
        if self.include_transcript {
            query.push(("include_transcript".to_string(), "true".to_string()));
        }
        if self.include_summary {
            query.push(("include_summary".to_string(), "true".to_string()));
        }
        if self.include_action_items {
            query.push(("include_action_items".to_string(), "true".to_string()));
        }
        if self.include_crm_matches {
            query.push(("include_crm_matches".to_string(), "true".to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor".to_string(), cursor.as_str().to_string()));
        }
        query
    }
}

/// Client for `api.mynah.dev/external/v1`.
pub struct MynahClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for MynahClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MynahClient")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MynahClient {
    /// Build a client from configuration.
    ///
    /// Fails before any network call when no API key is configured.
    pub fn new(config: &MynahConfig) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("mynah-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Invalid {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// GET a path with pre-built query pairs, returning the raw JSON body.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.build_url(path, query);
        debug!(%url, "GET Mynah API");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;
        self.handle_response(path, response).await
    }

    /// POST a JSON body, returning the raw JSON response body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.build_url(path, &[]);
        debug!(%url, "POST Mynah API");
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;
        self.handle_response(path, response).await
    }

    /// DELETE a path. The response body, if any, is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.build_url(path, &[]);
        debug!(%url, "DELETE Mynah API");
        let response = self
            .http
            .delete(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let retry_after_secs = retry_after(&response);
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), retry_after_secs, &body, path))
    }

    /// Fetch one page of meetings.
    pub async fn list_meetings(
        &self,
        filters: &MeetingFilters,
        cursor: Option<&Cursor>,
    ) -> Result<Page<Meeting>, ApiError> {
        let value = self.get("/meetings", &filters.to_query(cursor)).await?;
        decode("/meetings", value)
    }

    /// Fetch every page of meetings matching the filters, following
    /// `next_cursor` until the collection ends or [`MAX_PAGES`] is hit.
    ///
    /// Pages are fetched strictly in sequence; each cursor is only known from
    /// the previous response. Any page failure fails the whole aggregation
    /// with nothing kept.
    pub async fn list_all_meetings(
        &self,
        filters: &MeetingFilters,
    ) -> Result<Vec<Meeting>, ApiError> {
        let mut meetings = Vec::new();
        let mut cursor: Option<Cursor> = None;

        for page_number in 1..=MAX_PAGES {
            let page = self.list_meetings(filters, cursor.as_ref()).await?;
            debug!(
                page = page_number,
                items = page.items.len(),
                "Fetched meetings page"
            );
            meetings.extend(page.items);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(meetings),
            }
        }

        warn!(
            pages = MAX_PAGES,
            total = meetings.len(),
            "Stopping aggregation at the page ceiling with a cursor still pending"
        );
        Ok(meetings)
    }

    /// Fetch the AI summary of one recording.
    pub async fn get_summary(&self, recording_id: u64) -> Result<RecordingSummary, ApiError> {
        let path = format!("/recordings/{recording_id}/summary");
        let value = self.get(&path, &[]).await?;
        decode(&path, value)
    }

    /// Fetch the transcript of one recording.
    pub async fn get_transcript(&self, recording_id: u64) -> Result<RecordingTranscript, ApiError> {
        let path = format!("/recordings/{recording_id}/transcript");
        let value = self.get(&path, &[]).await?;
        decode(&path, value)
    }

    /// Fetch one page of teams.
    pub async fn list_teams(&self, cursor: Option<&Cursor>) -> Result<Page<Team>, ApiError> {
        let mut query = Vec::new();
        if let Some(cursor) = cursor {
            query.push(("cursor".to_string(), cursor.as_str().to_string()));
        }
        let value = self.get("/teams", &query).await?;
        decode("/teams", value)
    }

    /// Fetch one page of team members, optionally filtered by team name.
    pub async fn list_team_members(
        &self,
        team: Option<&str>,
        cursor: Option<&Cursor>,
    ) -> Result<Page<TeamMember>, ApiError> {
        let mut query = Vec::new();
        if let Some(team) = team {
            query.push(("team".to_string(), team.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor".to_string(), cursor.as_str().to_string()));
        }
        let value = self.get("/team_members", &query).await?;
        decode("/team_members", value)
    }

    /// Register a webhook. The response carries the one-time signing secret.
    pub async fn create_webhook(&self, request: &CreateWebhookRequest) -> Result<Webhook, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Unknown {
            message: format!("failed to encode webhook request: {e}"),
        })?;
        let value = self.post("/webhooks", &body).await?;
        decode("/webhooks", value)
    }

    /// Delete a webhook by id.
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/webhooks/{webhook_id}")).await
    }

    /// Join base URL, path, and query pairs.
    ///
    /// Array keys keep their literal brackets; that repeated bracketed form
    /// is the remote's wire contract. Values are percent-encoded.
    fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let encoded: Vec<String> = query
                .iter()
                .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }
        url
    }

    async fn handle_response(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Value, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| ApiError::Unknown {
                message: format!("invalid JSON from the Mynah API: {e}"),
            });
        }

        let retry_after_secs = retry_after(&response);
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), retry_after_secs, &body, path))
    }

    fn classify_transport(&self, err: reqwest::Error) -> ApiError {
        // Connect timeouts report both is_timeout and is_connect; timeout
        // wins so deadline overruns all land in one variant.
        if err.is_timeout() {
            ApiError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            ApiError::NetworkUnreachable {
                message: err.to_string(),
            }
        } else {
            ApiError::Unknown {
                message: err.to_string(),
            }
        }
    }
}

/// Map a non-success HTTP status onto the error taxonomy.
fn classify_status(
    status: u16,
    retry_after_secs: Option<u64>,
    body: &str,
    path: &str,
) -> ApiError {
    match status {
        400 => ApiError::InvalidRequest {
            message: extract_api_message(body),
        },
        401 => ApiError::AuthenticationFailed,
        403 => ApiError::Forbidden,
        404 => ApiError::NotFound {
            resource: path.to_string(),
        },
        429 => ApiError::RateLimited { retry_after_secs },
        500..=599 => ApiError::RemoteUnavailable { status },
        _ => ApiError::Unknown {
            message: format!("HTTP {status}: {}", extract_api_message(body)),
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// The Mynah API uses `{"message": "..."}`; older endpoints use `"error"`.
/// Falls back to the raw text, clipped.
fn extract_api_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no detail provided".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

fn retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Unknown {
        message: format!("unexpected response shape from {path}: {e}"),
    })
}
