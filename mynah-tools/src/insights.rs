//! Cross-meeting insight tools: search and statistics.
//!
//! All three tools aggregate the full filtered collection through the
//! client's paginated fetch before computing anything, so their numbers are
//! collection-wide rather than page-local.

use std::sync::Arc;

use async_trait::async_trait;
use mynah_core::error::ToolError;
use mynah_core::types::{ResponseFormat, RiskLevel, ToolOutput};
use serde_json::{json, Value};

use crate::analytics;
use crate::args::{bounded_limit, invalid_args, optional_str, required_str, response_format, string_array};
use crate::client::{MeetingFilters, MynahClient};
use crate::registry::Tool;
use crate::render;
use crate::search::{self, MAX_QUERY_LEN, MIN_QUERY_LEN};

const DEFAULT_SEARCH_LIMIT: u64 = 10;
const DEFAULT_PARTICIPANT_LIMIT: u64 = 25;

/// Search meeting titles, transcripts, and summaries.
pub struct SearchMeetingsTool {
    client: Arc<MynahClient>,
}

impl SearchMeetingsTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchMeetingsTool {
    fn name(&self) -> &str {
        "search_meetings"
    }

    fn description(&self) -> &str {
        "Search across meeting titles, transcripts, and summaries for a phrase. \
         Returns matching meetings with context snippets around each match."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": MIN_QUERY_LEN,
                    "maxLength": MAX_QUERY_LEN,
                    "description": "Phrase to search for, matched case-insensitively"
                },
                "created_after": {
                    "type": "string",
                    "description": "Only meetings created after this ISO 8601 timestamp"
                },
                "created_before": {
                    "type": "string",
                    "description": "Only meetings created before this ISO 8601 timestamp"
                },
                "teams": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only meetings recorded by members of these teams"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 50,
                    "description": "Maximum matches to return, 10 by default"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output encoding, markdown by default"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let format = response_format(&args, self.name())?;

        let query = required_str(&args, "query", self.name())?;
        let query_len = query.chars().count();
        if !(MIN_QUERY_LEN..=MAX_QUERY_LEN).contains(&query_len) {
            return Err(invalid_args(
                self.name(),
                format!("'query' must be between {MIN_QUERY_LEN} and {MAX_QUERY_LEN} characters"),
            ));
        }
        let limit = bounded_limit(&args, "limit", 1, 50, DEFAULT_SEARCH_LIMIT, self.name())?;

        // Transcripts and summaries are what the search scans, so their
        // inclusion is forced regardless of what the caller asked for.
        let filters = MeetingFilters {
            created_after: optional_str(&args, "created_after", self.name())?.map(str::to_string),
            created_before: optional_str(&args, "created_before", self.name())?.map(str::to_string),
            teams: string_array(&args, "teams", self.name())?,
            include_transcript: true,
            include_summary: true,
            ..MeetingFilters::default()
        };

        let meetings = self.client.list_all_meetings(&filters).await?;
        let report = search::search_meetings(&meetings, query, limit);

        let text = render::govern_response(report.matches.len(), |n| match format {
            ResponseFormat::Markdown => render::search_markdown(&report, n),
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "query": report.query,
                "total_searched": report.total_searched,
                "match_count": report.matches.len(),
                "matches": &report.matches[..n],
            })),
        });

        Ok(ToolOutput::text(text)
            .with_metadata("total_searched", json!(report.total_searched))
            .with_metadata("match_count", json!(report.matches.len())))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}

/// Duration, team, and internal/external statistics.
pub struct MeetingStatsTool {
    client: Arc<MynahClient>,
}

impl MeetingStatsTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MeetingStatsTool {
    fn name(&self) -> &str {
        "meeting_stats"
    }

    fn description(&self) -> &str {
        "Compute statistics over recorded meetings: duration aggregates, \
         per-team counts, and the internal versus external split."
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
                "teams": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only meetings recorded by members of these teams"
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
            teams: string_array(&args, "teams", self.name())?,
            ..MeetingFilters::default()
        };

        let meetings = self.client.list_all_meetings(&filters).await?;

        let Some(stats) = analytics::compute_meeting_stats(&meetings) else {
            return Ok(no_data_output(format));
        };

        let text = render::govern_response(stats.by_team.len(), |n| match format {
            ResponseFormat::Markdown => render::meeting_stats_markdown(&stats, n),
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "total_meetings": stats.total_meetings,
                "internal_meetings": stats.internal_meetings,
                "external_meetings": stats.external_meetings,
                "duration": stats.duration,
                "by_team": &stats.by_team[..n],
            })),
        });

        Ok(ToolOutput::text(text).with_metadata("total_meetings", json!(stats.total_meetings)))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}

/// Participant, recorder, and domain frequency tables.
pub struct ParticipantStatsTool {
    client: Arc<MynahClient>,
}

impl ParticipantStatsTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ParticipantStatsTool {
    fn name(&self) -> &str {
        "participant_stats"
    }

    fn description(&self) -> &str {
        "Rank meeting participants, recorders, and email domains by how often \
         they appear across recorded meetings."
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
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 100,
                    "description": "Rows per table, 25 by default"
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
        let limit = bounded_limit(
            &args,
            "limit",
            1,
            100,
            DEFAULT_PARTICIPANT_LIMIT,
            self.name(),
        )?;
        let filters = MeetingFilters {
            created_after: optional_str(&args, "created_after", self.name())?.map(str::to_string),
            created_before: optional_str(&args, "created_before", self.name())?.map(str::to_string),
            ..MeetingFilters::default()
        };

        let meetings = self.client.list_all_meetings(&filters).await?;

        let Some(stats) = analytics::compute_participant_stats(&meetings, limit) else {
            return Ok(no_data_output(format));
        };

        let table_rows = stats
            .top_participants
            .len()
            .max(stats.top_recorders.len())
            .max(stats.top_domains.len());

        let text = render::govern_response(table_rows, |n| match format {
            ResponseFormat::Markdown => render::participant_stats_markdown(&stats, n),
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "total_meetings": stats.total_meetings,
                "unique_participants": stats.unique_participants,
                "top_participants": stats.top_participants.iter().take(n).collect::<Vec<_>>(),
                "top_recorders": stats.top_recorders.iter().take(n).collect::<Vec<_>>(),
                "top_domains": stats.top_domains.iter().take(n).collect::<Vec<_>>(),
            })),
        });

        Ok(ToolOutput::text(text).with_metadata("total_meetings", json!(stats.total_meetings)))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}

/// Soft no-data result shared by the stats tools.
fn no_data_output(format: ResponseFormat) -> ToolOutput {
    let text = match format {
        ResponseFormat::Markdown => {
            "No meetings found matching the given filters.".to_string()
        }
        ResponseFormat::Json => render::to_pretty_json(&json!({
            "total_meetings": 0,
            "message": "No meetings found matching the given filters.",
        })),
    };
    ToolOutput::text(text).with_metadata("total_meetings", json!(0))
}
