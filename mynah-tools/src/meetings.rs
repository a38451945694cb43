//! Meeting tools: listing, summaries, and transcripts.

use std::sync::Arc;

use async_trait::async_trait;
use mynah_core::error::ToolError;
use mynah_core::models::Cursor;
use mynah_core::types::{ResponseFormat, RiskLevel, ToolOutput};
use serde_json::{json, Value};

use crate::args::{optional_bool, optional_str, required_u64, response_format, string_array};
use crate::client::{MeetingFilters, MynahClient};
use crate::registry::Tool;
use crate::render;

/// Fetch one page of meetings with optional filters.
pub struct ListMeetingsTool {
    client: Arc<MynahClient>,
}

impl ListMeetingsTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListMeetingsTool {
    fn name(&self) -> &str {
        "list_meetings"
    }

    fn description(&self) -> &str {
        "List recorded meetings with optional date, attendee, and team filters. \
         Returns one page of results; pass the returned cursor to fetch the next page."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "created_after": {
                    "type": "string",
                    "description": "Only meetings created after this ISO 8601 timestamp"
                },
                "created_before": {
                    "type": "string",
                    "description": "Only meetings created before this ISO 8601 timestamp"
                },
                "calendar_invitees": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only meetings that included these invitee emails"
                },
                "recorded_by": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only meetings recorded by these user emails"
                },
                "teams": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only meetings recorded by members of these teams"
                },
                "include_transcript": {
                    "type": "boolean",
                    "description": "Attach the full transcript to each meeting"
                },
                "include_summary": {
                    "type": "boolean",
                    "description": "Attach the AI summary to each meeting"
                },
                "include_action_items": {
                    "type": "boolean",
                    "description": "Attach action items to each meeting"
                },
                "include_crm_matches": {
                    "type": "boolean",
                    "description": "Attach CRM matches to each meeting"
                },
                "cursor": {
                    "type": "string",
                    "description": "Continuation cursor from a previous page"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output encoding, markdown by default"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let format = response_format(&args, self.name())?;
        let filters = MeetingFilters {
            created_after: optional_str(&args, "created_after", self.name())?.map(str::to_string),
            created_before: optional_str(&args, "created_before", self.name())?.map(str::to_string),
            calendar_invitees: string_array(&args, "calendar_invitees", self.name())?,
            recorded_by: string_array(&args, "recorded_by", self.name())?,
            teams: string_array(&args, "teams", self.name())?,
            include_transcript: optional_bool(&args, "include_transcript", self.name())?,
            include_summary: optional_bool(&args, "include_summary", self.name())?,
            include_action_items: optional_bool(&args, "include_action_items", self.name())?,
            include_crm_matches: optional_bool(&args, "include_crm_matches", self.name())?,
        };
        let cursor = optional_str(&args, "cursor", self.name())?.map(Cursor::new);

        let page = self.client.list_meetings(&filters, cursor.as_ref()).await?;
        let next_cursor = page.next_cursor;
        let meetings = page.items;

        let text = render::govern_response(meetings.len(), |n| match format {
            ResponseFormat::Markdown => render::meetings_markdown(&meetings[..n], next_cursor.as_ref()),
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "count": n,
                "next_cursor": next_cursor,
                "meetings": &meetings[..n],
            })),
        });

        Ok(ToolOutput::text(text).with_metadata("count", json!(meetings.len())))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}

/// Fetch the AI summary of one recording.
pub struct GetSummaryTool {
    client: Arc<MynahClient>,
}

impl GetSummaryTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetSummaryTool {
    fn name(&self) -> &str {
        "get_summary"
    }

    fn description(&self) -> &str {
        "Get the AI-generated summary of a recording by its recording ID."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recording_id": {
                    "type": "integer",
                    "description": "Recording ID from list_meetings"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output encoding, markdown by default"
                }
            },
            "required": ["recording_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let format = response_format(&args, self.name())?;
        let recording_id = required_u64(&args, "recording_id", self.name())?;

        let result = self.client.get_summary(recording_id).await?;

        let text = render::govern_response(1, |_| match format {
            ResponseFormat::Markdown => {
                render::summary_markdown(result.recording_id, &result.summary)
            }
            ResponseFormat::Json => render::to_pretty_json(&result),
        });

        Ok(ToolOutput::text(text))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}

/// Fetch the transcript of one recording.
pub struct GetTranscriptTool {
    client: Arc<MynahClient>,
}

impl GetTranscriptTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetTranscriptTool {
    fn name(&self) -> &str {
        "get_transcript"
    }

    fn description(&self) -> &str {
        "Get the full speaker-attributed transcript of a recording by its recording ID."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recording_id": {
                    "type": "integer",
                    "description": "Recording ID from list_meetings"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output encoding, markdown by default"
                }
            },
            "required": ["recording_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let format = response_format(&args, self.name())?;
        let recording_id = required_u64(&args, "recording_id", self.name())?;

        let result = self.client.get_transcript(recording_id).await?;
        let entries = result.transcript;

        // A long call can easily overflow the response ceiling; the governor
        // halves the utterance list when it does.
        let text = render::govern_response(entries.len(), |n| match format {
            ResponseFormat::Markdown => render::transcript_markdown(recording_id, &entries[..n]),
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "recording_id": recording_id,
                "utterance_count": n,
                "transcript": &entries[..n],
            })),
        });

        Ok(ToolOutput::text(text).with_metadata("utterances", json!(entries.len())))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}
