//! Data models for the Mynah external API.
//!
//! These mirror the wire format of `api.mynah.dev/external/v1`. Optional
//! sections of a meeting (transcript, summary, action items, CRM matches) are
//! `Option` so that "not requested" stays distinguishable from "requested but
//! empty".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque continuation token returned by list endpoints.
///
/// The internal format belongs to the remote API; it is carried verbatim and
/// never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Page size the server applied.
    pub limit: u32,
    /// Token for the next page; `None` on the final page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
    /// Items on this page. May be empty even when `next_cursor` is set.
    pub items: Vec<T>,
}

/// Domain mix of a meeting's calendar invitees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainType {
    /// Every invitee belongs to the recorder's own organization.
    InternalOnly,
    /// At least one invitee is from an outside domain.
    HasExternal,
}

/// A recorded meeting as returned by `GET /meetings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub recording_id: u64,
    pub title: String,
    /// Calendar event title when it differs from the recording title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_title: Option<String>,
    /// Share URL of the recording.
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub scheduled_start_time: DateTime<Utc>,
    pub scheduled_end_time: DateTime<Utc>,
    pub recording_start_time: DateTime<Utc>,
    pub recording_end_time: DateTime<Utc>,
    pub calendar_invitees_domain_type: DomainType,
    pub recorded_by: Recorder,
    #[serde(default)]
    pub calendar_invitees: Vec<Invitee>,
    /// Present only when the listing was requested with a summary template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_summary: Option<Summary>,
    /// Present only when `include_transcript` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptEntry>>,
    /// Present only when `include_action_items` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<ActionItem>>,
    /// Present only when `include_crm_matches` was set and matching succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_matches: Option<CrmMatches>,
    /// Set instead of `crm_matches` when CRM matching failed server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_matches_error: Option<String>,
}

impl Meeting {
    /// Recording duration in whole minutes, rounded half away from zero.
    ///
    /// Always derived from the recording timestamps, never the scheduled ones.
    pub fn duration_minutes(&self) -> i64 {
        let ms = (self.recording_end_time - self.recording_start_time).num_milliseconds();
        (ms as f64 / 60_000.0).round() as i64
    }
}

/// The user whose Mynah notetaker captured the meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recorder {
    pub name: String,
    pub email: String,
    pub email_domain: String,
    /// Team the recorder belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// A calendar invitee of the recorded meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitee {
    pub name: String,
    pub email: String,
    pub email_domain: String,
    pub is_external: bool,
}

/// AI-generated summary of a recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_formatted: Option<String>,
}

/// One utterance in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Offset into the recording, `HH:MM:SS`.
    pub timestamp: String,
}

/// Speaker attribution for a transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub display_name: String,
    /// Invitee email when diarization matched the voice to the calendar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_calendar_invitee_email: Option<String>,
}

/// An action item extracted from a recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    /// Offset into the recording where the item came up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
}

/// Person an action item is assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignee {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// CRM records matched against the meeting's participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmMatches {
    #[serde(default)]
    pub contacts: Vec<CrmContact>,
    #[serde(default)]
    pub companies: Vec<CrmCompany>,
    #[serde(default)]
    pub deals: Vec<CrmDeal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmContact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmCompany {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmDeal {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// Envelope of `GET /recordings/{id}/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub recording_id: u64,
    pub summary: Summary,
}

/// Envelope of `GET /recordings/{id}/transcript`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingTranscript {
    pub recording_id: u64,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
}

/// A team in the workspace, from `GET /teams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A workspace member, from `GET /team_members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Which recordings fire a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    MyRecordings,
    MySharedRecordings,
    TeamRecordings,
    AllRecordings,
}

impl TriggerType {
    pub const ALL: [TriggerType; 4] = [
        TriggerType::MyRecordings,
        TriggerType::MySharedRecordings,
        TriggerType::TeamRecordings,
        TriggerType::AllRecordings,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "my_recordings" => Some(TriggerType::MyRecordings),
            "my_shared_recordings" => Some(TriggerType::MySharedRecordings),
            "team_recordings" => Some(TriggerType::TeamRecordings),
            "all_recordings" => Some(TriggerType::AllRecordings),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::MyRecordings => "my_recordings",
            TriggerType::MySharedRecordings => "my_shared_recordings",
            TriggerType::TeamRecordings => "team_recordings",
            TriggerType::AllRecordings => "all_recordings",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    pub destination_url: String,
    pub triggered_for: Vec<TriggerType>,
    pub include_transcript: bool,
    pub include_summary: bool,
    pub include_action_items: bool,
    pub include_crm_matches: bool,
}

/// A registered webhook subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub destination_url: String,
    /// Signing secret, only ever returned at creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub include_transcript: bool,
    #[serde(default)]
    pub include_summary: bool,
    #[serde(default)]
    pub include_action_items: bool,
    #[serde(default)]
    pub include_crm_matches: bool,
    pub triggered_for: Vec<TriggerType>,
}
