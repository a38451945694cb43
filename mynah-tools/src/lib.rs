//! # Mynah Tools
//!
//! The Mynah tool set and the layers behind it: the API client with cursor
//! pagination, the analytics and search engines, and the response renderer
//! with its output-size governor.

pub mod analytics;
mod args;
pub mod client;
pub mod insights;
pub mod meetings;
pub mod registry;
pub mod render;
pub mod search;
pub mod teams;
pub mod webhooks;

use std::sync::Arc;

use client::MynahClient;
use registry::{Tool, ToolRegistry};

/// Register every built-in tool against one shared API client.
pub fn register_builtin_tools(registry: &mut ToolRegistry, client: Arc<MynahClient>) {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(meetings::ListMeetingsTool::new(client.clone())),
        Arc::new(meetings::GetSummaryTool::new(client.clone())),
        Arc::new(meetings::GetTranscriptTool::new(client.clone())),
        Arc::new(teams::ListTeamsTool::new(client.clone())),
        Arc::new(teams::ListTeamMembersTool::new(client.clone())),
        Arc::new(webhooks::CreateWebhookTool::new(client.clone())),
        Arc::new(webhooks::DeleteWebhookTool::new(client.clone())),
        Arc::new(insights::SearchMeetingsTool::new(client.clone())),
        Arc::new(insights::MeetingStatsTool::new(client.clone())),
        Arc::new(insights::ParticipantStatsTool::new(client)),
    ];

    for tool in tools {
        if let Err(e) = registry.register(tool) {
            tracing::warn!("Failed to register tool: {}", e);
        }
    }
}
