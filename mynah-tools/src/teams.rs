//! Team directory tools.

use std::sync::Arc;

use async_trait::async_trait;
use mynah_core::error::ToolError;
use mynah_core::models::Cursor;
use mynah_core::types::{ResponseFormat, RiskLevel, ToolOutput};
use serde_json::{json, Value};

use crate::args::{optional_str, response_format};
use crate::client::MynahClient;
use crate::registry::Tool;
use crate::render;

/// List teams in the workspace.
pub struct ListTeamsTool {
    client: Arc<MynahClient>,
}

impl ListTeamsTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListTeamsTool {
    fn name(&self) -> &str {
        "list_teams"
    }

    fn description(&self) -> &str {
        "List the teams in the Mynah workspace. Returns one page; pass the \
         returned cursor to fetch the next page."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
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
        let cursor = optional_str(&args, "cursor", self.name())?.map(Cursor::new);

        let page = self.client.list_teams(cursor.as_ref()).await?;
        let next_cursor = page.next_cursor;
        let teams = page.items;

        let text = render::govern_response(teams.len(), |n| match format {
            ResponseFormat::Markdown => render::teams_markdown(&teams[..n], next_cursor.as_ref()),
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "count": n,
                "next_cursor": next_cursor,
                "teams": &teams[..n],
            })),
        });

        Ok(ToolOutput::text(text).with_metadata("count", json!(teams.len())))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}

/// List workspace members, optionally scoped to one team.
pub struct ListTeamMembersTool {
    client: Arc<MynahClient>,
}

impl ListTeamMembersTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListTeamMembersTool {
    fn name(&self) -> &str {
        "list_team_members"
    }

    fn description(&self) -> &str {
        "List workspace members and their emails, optionally filtered to one \
         team. Returns one page; pass the returned cursor to fetch the next page."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "team": {
                    "type": "string",
                    "description": "Only members of this team"
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
        let team = optional_str(&args, "team", self.name())?;
        let cursor = optional_str(&args, "cursor", self.name())?.map(Cursor::new);

        let page = self.client.list_team_members(team, cursor.as_ref()).await?;
        let next_cursor = page.next_cursor;
        let members = page.items;

        let text = render::govern_response(members.len(), |n| match format {
            ResponseFormat::Markdown => {
                render::team_members_markdown(&members[..n], next_cursor.as_ref())
            }
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "count": n,
                "next_cursor": next_cursor,
                "members": &members[..n],
            })),
        });

        Ok(ToolOutput::text(text).with_metadata("count", json!(members.len())))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::ReadOnly
    }
}
