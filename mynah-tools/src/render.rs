//! Response rendering and output-size governance.
//!
//! Every tool renders its structured result as either pretty JSON or a
//! hand-composed markdown document, then runs the text through
//! [`govern_response`]. Oversized output gets one halving pass over the item
//! collection; if that is still too large, the text is sliced hard at the
//! ceiling. The ceiling always holds.

use mynah_core::models::{Cursor, Meeting, Summary, Team, TeamMember, TranscriptEntry, Webhook};
use serde::Serialize;

use crate::analytics::{MeetingStats, ParticipantStats};
use crate::search::SearchReport;

/// Character ceiling on any rendered tool response.
pub const MAX_RESPONSE_CHARS: usize = 25_000;

/// Render under the size ceiling.
///
/// `total` is the size of the underlying item collection; `render(n)` must
/// render only the first `n` items. When the full rendering exceeds
/// [`MAX_RESPONSE_CHARS`], the collection is halved once (`ceil(total/2)`),
/// re-rendered behind a notice stating both counts, and finally sliced raw
/// if even that overflows. The halving is deliberately single-pass.
pub fn govern_response<F>(total: usize, render: F) -> String
where
    F: Fn(usize) -> String,
{
    let full = render(total);
    if full.chars().count() <= MAX_RESPONSE_CHARS {
        return full;
    }

    let kept = total.div_ceil(2);
    let halved = render(kept);
    let with_notice = format!(
        "[Showing {kept} of {total} items. The full output exceeded the \
         {MAX_RESPONSE_CHARS} character response limit.]\n\n{halved}"
    );
    if with_notice.chars().count() <= MAX_RESPONSE_CHARS {
        return with_notice;
    }

    hard_slice(&with_notice)
}

/// Slice text to the ceiling on a character boundary, ending with a notice.
fn hard_slice(text: &str) -> String {
    const NOTICE: &str = "\n\n[Output truncated at the response size limit]";
    let budget = MAX_RESPONSE_CHARS - NOTICE.chars().count();
    let mut sliced: String = text.chars().take(budget).collect();
    sliced.push_str(NOTICE);
    sliced
}

/// Pretty-print a serializable payload.
pub fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to encode response: {e}"}}"#))
}

/// Human-readable label for the invitee domain mix.
fn domain_mix_label(meeting: &Meeting) -> &'static str {
    use mynah_core::models::DomainType;
    match meeting.calendar_invitees_domain_type {
        DomainType::InternalOnly => "internal only",
        DomainType::HasExternal => "includes external attendees",
    }
}

fn cursor_hint(tool: &str, cursor: &Cursor) -> String {
    format!(
        "**More results available.** Call `{tool}` again with `cursor` set to \
         `\"{cursor}\"` to fetch the next page.\n"
    )
}

/// Markdown for a page of meetings.
pub fn meetings_markdown(meetings: &[Meeting], next_cursor: Option<&Cursor>) -> String {
    let mut md = String::new();
    md.push_str("# Meetings\n\n");

    if meetings.is_empty() {
        md.push_str("No meetings found matching the given filters.\n");
    } else {
        md.push_str(&format!("{} meeting(s) on this page.\n\n", meetings.len()));
        for meeting in meetings {
            md.push_str(&meeting_block(meeting));
        }
    }

    if let Some(cursor) = next_cursor {
        md.push('\n');
        md.push_str(&cursor_hint("list_meetings", cursor));
    }
    md
}

fn meeting_block(meeting: &Meeting) -> String {
    let mut md = String::new();
    md.push_str(&format!("## {}\n\n", meeting.title));
    if let Some(event_title) = &meeting.meeting_title {
        if event_title != &meeting.title {
            md.push_str(&format!("**Calendar event:** {event_title}\n"));
        }
    }
    md.push_str(&format!("**Recording ID:** {}\n", meeting.recording_id));
    md.push_str(&format!(
        "**Recorded:** {} ({} min)\n",
        meeting.recording_start_time.format("%Y-%m-%d %H:%M UTC"),
        meeting.duration_minutes()
    ));
    let recorder = &meeting.recorded_by;
    match &recorder.team {
        Some(team) => md.push_str(&format!(
            "**Recorded by:** {} <{}> ({team})\n",
            recorder.name, recorder.email
        )),
        None => md.push_str(&format!(
            "**Recorded by:** {} <{}>\n",
            recorder.name, recorder.email
        )),
    }
    md.push_str(&format!("**Attendee mix:** {}\n", domain_mix_label(meeting)));
    if !meeting.calendar_invitees.is_empty() {
        let names: Vec<&str> = meeting
            .calendar_invitees
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        md.push_str(&format!("**Invitees:** {}\n", names.join(", ")));
    }
    md.push_str(&format!("**URL:** {}\n", meeting.url));

    if let Some(summary) = &meeting.default_summary {
        if let Some(body) = &summary.markdown_formatted {
            md.push_str("\n### Summary\n\n");
            md.push_str(body);
            md.push('\n');
        }
    }
    if let Some(items) = &meeting.action_items {
        md.push_str("\n### Action items\n\n");
        if items.is_empty() {
            md.push_str("None recorded.\n");
        }
        for item in items {
            let checkbox = if item.completed { "[x]" } else { "[ ]" };
            match &item.assignee {
                Some(assignee) => md.push_str(&format!(
                    "- {checkbox} {} ({})\n",
                    item.description, assignee.name
                )),
                None => md.push_str(&format!("- {checkbox} {}\n", item.description)),
            }
        }
    }
    if let Some(error) = &meeting.crm_matches_error {
        md.push_str(&format!("\n*CRM matches unavailable: {error}*\n"));
    }
    md.push('\n');
    md
}

/// Markdown for one recording's summary.
pub fn summary_markdown(recording_id: u64, summary: &Summary) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Summary for recording {recording_id}\n\n"));
    if let Some(template) = &summary.template_name {
        md.push_str(&format!("**Template:** {template}\n\n"));
    }
    match &summary.markdown_formatted {
        Some(body) => md.push_str(body),
        None => md.push_str("No summary has been generated for this recording."),
    }
    md.push('\n');
    md
}

/// Markdown for a transcript slice.
pub fn transcript_markdown(recording_id: u64, entries: &[TranscriptEntry]) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Transcript for recording {recording_id}\n\n"));
    if entries.is_empty() {
        md.push_str("No transcript is available for this recording.\n");
        return md;
    }
    md.push_str(&format!("{} utterance(s).\n\n", entries.len()));
    for entry in entries {
        md.push_str(&format!(
            "[{}] {}: {}\n",
            entry.timestamp, entry.speaker.display_name, entry.text
        ));
    }
    md
}

/// Markdown for a page of teams.
pub fn teams_markdown(teams: &[Team], next_cursor: Option<&Cursor>) -> String {
    let mut md = String::new();
    md.push_str("# Teams\n\n");
    if teams.is_empty() {
        md.push_str("No teams found.\n");
    } else {
        md.push_str("| Team | Created |\n");
        md.push_str("|---|---|\n");
        for team in teams {
            md.push_str(&format!(
                "| {} | {} |\n",
                team.name,
                team.created_at.format("%Y-%m-%d")
            ));
        }
    }
    if let Some(cursor) = next_cursor {
        md.push('\n');
        md.push_str(&cursor_hint("list_teams", cursor));
    }
    md
}

/// Markdown for a page of team members.
pub fn team_members_markdown(members: &[TeamMember], next_cursor: Option<&Cursor>) -> String {
    let mut md = String::new();
    md.push_str("# Team members\n\n");
    if members.is_empty() {
        md.push_str("No team members found.\n");
    } else {
        md.push_str("| Name | Email | Added |\n");
        md.push_str("|---|---|---|\n");
        for member in members {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                member.name,
                member.email,
                member.created_at.format("%Y-%m-%d")
            ));
        }
    }
    if let Some(cursor) = next_cursor {
        md.push('\n');
        md.push_str(&cursor_hint("list_team_members", cursor));
    }
    md
}

/// Markdown for search results. `matches_shown` may be a governed slice of
/// the report's full match list.
pub fn search_markdown(report: &SearchReport, matches_shown: usize) -> String {
    let shown = &report.matches[..matches_shown.min(report.matches.len())];
    let mut md = String::new();
    md.push_str(&format!("# Search results for \"{}\"\n\n", report.query));
    md.push_str(&format!(
        "{} of {} meeting(s) matched.\n\n",
        report.matches.len(),
        report.total_searched
    ));

    for found in shown {
        md.push_str(&format!(
            "## {} (ID {})\n\n",
            found.title, found.recording_id
        ));
        let mut matched_in = Vec::new();
        if found.title_match {
            matched_in.push("title");
        }
        if found.transcript_match {
            matched_in.push("transcript");
        }
        if found.summary_match {
            matched_in.push("summary");
        }
        md.push_str(&format!("**Matched in:** {}\n", matched_in.join(", ")));
        md.push_str(&format!(
            "**Date:** {}\n",
            found.created_at.format("%Y-%m-%d")
        ));
        md.push_str(&format!("**URL:** {}\n", found.url));
        if !found.snippets.is_empty() {
            md.push('\n');
            for snippet in &found.snippets {
                md.push_str(&format!("> {snippet}\n"));
            }
        }
        md.push('\n');
    }
    md
}

/// Markdown for the meeting statistics report. `team_rows` limits the
/// by-team table for governed re-rendering.
pub fn meeting_stats_markdown(stats: &MeetingStats, team_rows: usize) -> String {
    let mut md = String::new();
    md.push_str("# Meeting statistics\n\n");
    md.push_str(&format!("**Total meetings:** {}\n", stats.total_meetings));
    md.push_str(&format!(
        "**Internal:** {} | **External:** {}\n\n",
        stats.internal_meetings, stats.external_meetings
    ));

    md.push_str("## Duration\n\n");
    md.push_str(&format!(
        "**Average:** {} min\n",
        stats.duration.mean_minutes
    ));
    md.push_str(&format!("**Shortest:** {} min\n", stats.duration.min_minutes));
    md.push_str(&format!("**Longest:** {} min\n", stats.duration.max_minutes));
    md.push_str(&format!("**Total:** {} min\n\n", stats.duration.total_minutes));

    md.push_str("## Meetings by team\n\n");
    md.push_str("| Team | Meetings |\n");
    md.push_str("|---|---|\n");
    for row in stats.by_team.iter().take(team_rows) {
        md.push_str(&format!("| {} | {} |\n", row.team, row.count));
    }
    md
}

/// Markdown for the participant statistics report. `rows` limits each table
/// for governed re-rendering.
pub fn participant_stats_markdown(stats: &ParticipantStats, rows: usize) -> String {
    let mut md = String::new();
    md.push_str("# Participant statistics\n\n");
    md.push_str(&format!(
        "**Meetings analyzed:** {}\n",
        stats.total_meetings
    ));
    md.push_str(&format!(
        "**Unique participants:** {}\n\n",
        stats.unique_participants
    ));

    md.push_str("## Top participants\n\n");
    md.push_str("| Participant | Email | Meetings |\n");
    md.push_str("|---|---|---|\n");
    for row in stats.top_participants.iter().take(rows) {
        md.push_str(&format!("| {} | {} | {} |\n", row.name, row.email, row.count));
    }

    md.push_str("\n## Top recorders\n\n");
    md.push_str("| Recorder | Email | Recordings |\n");
    md.push_str("|---|---|---|\n");
    for row in stats.top_recorders.iter().take(rows) {
        md.push_str(&format!("| {} | {} | {} |\n", row.name, row.email, row.count));
    }

    md.push_str("\n## Top domains\n\n");
    md.push_str("| Domain | Invitee appearances |\n");
    md.push_str("|---|---|\n");
    for row in stats.top_domains.iter().take(rows) {
        md.push_str(&format!("| {} | {} |\n", row.domain, row.count));
    }
    md
}

/// Markdown for a freshly created webhook, secret included.
pub fn webhook_created_markdown(webhook: &Webhook) -> String {
    let mut md = String::new();
    md.push_str("# Webhook created\n\n");
    md.push_str(&format!("**ID:** {}\n", webhook.id));
    md.push_str(&format!("**Destination:** {}\n", webhook.destination_url));
    let triggers: Vec<&str> = webhook.triggered_for.iter().map(|t| t.as_str()).collect();
    md.push_str(&format!("**Triggers:** {}\n", triggers.join(", ")));

    let mut includes = Vec::new();
    if webhook.include_transcript {
        includes.push("transcript");
    }
    if webhook.include_summary {
        includes.push("summary");
    }
    if webhook.include_action_items {
        includes.push("action items");
    }
    if webhook.include_crm_matches {
        includes.push("CRM matches");
    }
    if !includes.is_empty() {
        md.push_str(&format!("**Payload includes:** {}\n", includes.join(", ")));
    }

    if let Some(secret) = &webhook.secret {
        md.push_str(&format!(
            "\n**Signing secret:** `{secret}`\n\n\
             Store this secret now. It is shown only once and cannot be \
             retrieved again.\n"
        ));
    }
    md
}
