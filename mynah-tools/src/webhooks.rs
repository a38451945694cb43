//! Webhook management tools.
//!
//! Validation happens entirely before any network call: a malformed
//! destination URL or an out-of-vocabulary trigger never leaves the process.

use std::sync::Arc;

use async_trait::async_trait;
use mynah_core::error::ToolError;
use mynah_core::models::{CreateWebhookRequest, TriggerType};
use mynah_core::types::{ResponseFormat, RiskLevel, ToolOutput};
use serde_json::{json, Value};

use crate::args::{invalid_args, optional_bool, required_str, response_format};
use crate::client::MynahClient;
use crate::registry::Tool;
use crate::render;

/// Register a webhook for new recordings.
pub struct CreateWebhookTool {
    client: Arc<MynahClient>,
}

impl CreateWebhookTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }

    fn parse_triggers(&self, args: &Value) -> Result<Vec<TriggerType>, ToolError> {
        let raw = match args.get("triggered_for") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(invalid_args(
                    self.name(),
                    "'triggered_for' must be an array of trigger types",
                ))
            }
            None => {
                return Err(invalid_args(
                    self.name(),
                    "missing 'triggered_for' parameter",
                ))
            }
        };
        if raw.is_empty() {
            return Err(invalid_args(
                self.name(),
                "'triggered_for' must contain at least one trigger type",
            ));
        }

        let mut triggers = Vec::new();
        for item in raw {
            let s = item.as_str().ok_or_else(|| {
                invalid_args(self.name(), "'triggered_for' must be an array of strings")
            })?;
            let trigger = TriggerType::parse(s).ok_or_else(|| {
                let known: Vec<&str> = TriggerType::ALL.iter().map(|t| t.as_str()).collect();
                invalid_args(
                    self.name(),
                    format!(
                        "unknown trigger type \"{s}\"; expected one of: {}",
                        known.join(", ")
                    ),
                )
            })?;
            if triggers.contains(&trigger) {
                return Err(invalid_args(
                    self.name(),
                    format!("duplicate trigger type \"{s}\""),
                ));
            }
            triggers.push(trigger);
        }
        Ok(triggers)
    }
}

#[async_trait]
impl Tool for CreateWebhookTool {
    fn name(&self) -> &str {
        "create_webhook"
    }

    fn description(&self) -> &str {
        "Register a webhook that fires when recordings become available. The \
         response includes a signing secret that is shown exactly once."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination_url": {
                    "type": "string",
                    "description": "Absolute http(s) URL that will receive deliveries"
                },
                "triggered_for": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": ["my_recordings", "my_shared_recordings", "team_recordings", "all_recordings"]
                    },
                    "description": "Which recordings fire the webhook; at least one value"
                },
                "include_transcript": {
                    "type": "boolean",
                    "description": "Include the transcript in deliveries"
                },
                "include_summary": {
                    "type": "boolean",
                    "description": "Include the AI summary in deliveries"
                },
                "include_action_items": {
                    "type": "boolean",
                    "description": "Include action items in deliveries"
                },
                "include_crm_matches": {
                    "type": "boolean",
                    "description": "Include CRM matches in deliveries"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output encoding, markdown by default"
                }
            },
            "required": ["destination_url", "triggered_for"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let format = response_format(&args, self.name())?;

        let destination_url = required_str(&args, "destination_url", self.name())?;
        let parsed = url::Url::parse(destination_url).map_err(|e| {
            invalid_args(
                self.name(),
                format!("'destination_url' is not a valid absolute URL: {e}"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid_args(
                self.name(),
                format!(
                    "'destination_url' must use http or https, got \"{}\"",
                    parsed.scheme()
                ),
            ));
        }

        let triggered_for = self.parse_triggers(&args)?;

        let request = CreateWebhookRequest {
            destination_url: destination_url.to_string(),
            triggered_for,
            include_transcript: optional_bool(&args, "include_transcript", self.name())?,
            include_summary: optional_bool(&args, "include_summary", self.name())?,
            include_action_items: optional_bool(&args, "include_action_items", self.name())?,
            include_crm_matches: optional_bool(&args, "include_crm_matches", self.name())?,
        };

        let webhook = self.client.create_webhook(&request).await?;

        let text = match format {
            ResponseFormat::Markdown => render::webhook_created_markdown(&webhook),
            ResponseFormat::Json => render::to_pretty_json(&webhook),
        };
        Ok(ToolOutput::text(text).with_metadata("webhook_id", json!(webhook.id)))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::Write
    }
}

/// Delete a webhook by id.
pub struct DeleteWebhookTool {
    client: Arc<MynahClient>,
}

impl DeleteWebhookTool {
    pub fn new(client: Arc<MynahClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteWebhookTool {
    fn name(&self) -> &str {
        "delete_webhook"
    }

    fn description(&self) -> &str {
        "Permanently delete a webhook registration by its ID."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "webhook_id": {
                    "type": "string",
                    "description": "ID of the webhook to delete"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output encoding, markdown by default"
                }
            },
            "required": ["webhook_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let format = response_format(&args, self.name())?;
        let webhook_id = required_str(&args, "webhook_id", self.name())?;
        if webhook_id.trim().is_empty() {
            return Err(invalid_args(self.name(), "'webhook_id' must not be empty"));
        }

        self.client.delete_webhook(webhook_id).await?;

        let text = match format {
            ResponseFormat::Markdown => {
                format!("Webhook `{webhook_id}` has been deleted. It will no longer receive deliveries.")
            }
            ResponseFormat::Json => render::to_pretty_json(&json!({
                "deleted": true,
                "webhook_id": webhook_id,
            })),
        };
        Ok(ToolOutput::text(text))
    }

    fn risk_level(&self) -> RiskLevel {
        RiskLevel::Destructive
    }
}
