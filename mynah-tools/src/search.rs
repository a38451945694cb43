//! Substring search across titles, transcripts, and summaries.
//!
//! Matching is case-insensitive and runs over a collection fetched with
//! transcripts and summaries included. Each matching utterance or summary
//! contributes a bounded context snippet; a meeting contributes at most
//! three snippets in total.

use chrono::{DateTime, Utc};
use mynah_core::models::Meeting;
use serde::Serialize;

/// Shortest accepted query.
pub const MIN_QUERY_LEN: usize = 2;
/// Longest accepted query.
pub const MAX_QUERY_LEN: usize = 200;
/// Snippet cap per meeting, shared between transcript and summary snippets.
pub const MAX_SNIPPETS_PER_MEETING: usize = 3;
/// Characters of context kept on each side of a match.
const SNIPPET_CONTEXT_CHARS: usize = 50;

/// One matching meeting.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub recording_id: u64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub title_match: bool,
    pub transcript_match: bool,
    pub summary_match: bool,
    /// Up to three `[timestamp] speaker: ...` or `[Summary] ...` lines.
    pub snippets: Vec<String>,
}

/// Search outcome over one aggregated collection.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// Size of the full aggregated collection, even when matching stopped
    /// early at the result limit.
    pub total_searched: usize,
    pub matches: Vec<SearchMatch>,
}

/// Scan the collection in aggregation order, collecting matches until
/// `limit` is reached.
///
/// Once the limit is hit, later meetings are not examined at all;
/// `total_searched` still reports the full collection size.
pub fn search_meetings(meetings: &[Meeting], query: &str, limit: usize) -> SearchReport {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();

    for meeting in meetings {
        if matches.len() >= limit {
            break;
        }
        if let Some(found) = match_meeting(meeting, &needle) {
            matches.push(found);
        }
    }

    SearchReport {
        query: query.to_string(),
        total_searched: meetings.len(),
        matches,
    }
}

/// Check one meeting against a lowercased needle.
fn match_meeting(meeting: &Meeting, needle: &str) -> Option<SearchMatch> {
    let title_match = meeting.title.to_lowercase().contains(needle)
        || meeting
            .meeting_title
            .as_ref()
            .is_some_and(|t| t.to_lowercase().contains(needle));

    let mut snippets = Vec::new();
    let mut transcript_match = false;
    if let Some(transcript) = &meeting.transcript {
        for entry in transcript {
            if snippets.len() >= MAX_SNIPPETS_PER_MEETING {
                break;
            }
            if let Some(snippet) = extract_snippet(&entry.text, needle) {
                transcript_match = true;
                snippets.push(format!(
                    "[{}] {}: {}",
                    entry.timestamp, entry.speaker.display_name, snippet
                ));
            }
        }
    }

    let mut summary_match = false;
    if let Some(body) = meeting
        .default_summary
        .as_ref()
        .and_then(|s| s.markdown_formatted.as_deref())
    {
        if body.to_lowercase().contains(needle) {
            summary_match = true;
            if snippets.len() < MAX_SNIPPETS_PER_MEETING {
                if let Some(snippet) = extract_snippet(body, needle) {
                    snippets.push(format!("[Summary] {snippet}"));
                }
            }
        }
    }

    if !(title_match || transcript_match || summary_match) {
        return None;
    }

    Some(SearchMatch {
        recording_id: meeting.recording_id,
        title: meeting.title.clone(),
        url: meeting.url.clone(),
        created_at: meeting.created_at,
        title_match,
        transcript_match,
        summary_match,
        snippets,
    })
}

/// Extract the first match of `needle` in `text` with up to
/// [`SNIPPET_CONTEXT_CHARS`] characters of context on each side.
///
/// The window is measured in characters and clipped to the text bounds;
/// `...` marks each clipped side. Returns `None` when the needle does not
/// occur.
fn extract_snippet(text: &str, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }

    // Case folding can grow the char count ('İ' folds to "i" plus a
    // combining dot), so offsets found in the folded text do not line up
    // with the original. The fold records, per folded char, the index of
    // the original char it came from; the window is applied in original
    // coordinates.
    let mut folded = String::new();
    let mut origin = Vec::new();
    for (index, ch) in text.chars().enumerate() {
        for low in ch.to_lowercase() {
            folded.push(low);
            origin.push(index);
        }
    }

    let byte_pos = folded.find(needle)?;
    let fold_start = folded[..byte_pos].chars().count();
    let fold_len = needle.chars().count();

    let match_start = origin[fold_start];
    let match_end = origin[fold_start + fold_len - 1] + 1;
    let total_chars = text.chars().count();

    let window_start = match_start.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let window_end = (match_end + SNIPPET_CONTEXT_CHARS).min(total_chars);

    let body: String = text
        .chars()
        .skip(window_start)
        .take(window_end - window_start)
        .collect();

    let mut snippet = String::new();
    if window_start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&body);
    if window_end < total_chars {
        snippet.push_str("...");
    }
    Some(snippet)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use mynah_core::models::{DomainType, Recorder, Speaker, Summary, TranscriptEntry};
    use pretty_assertions::assert_eq;

    use super::*;

    fn meeting(id: u64, title: &str) -> Meeting {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        Meeting {
            recording_id: id,
            title: title.to_string(),
            meeting_title: None,
            url: format!("https://app.mynah.dev/calls/{id}"),
            created_at: start,
            scheduled_start_time: start,
            scheduled_end_time: start + Duration::minutes(30),
            recording_start_time: start,
            recording_end_time: start + Duration::minutes(30),
            calendar_invitees_domain_type: DomainType::InternalOnly,
            recorded_by: Recorder {
                name: "Ana Ruiz".to_string(),
                email: "ana@acme.io".to_string(),
                email_domain: "acme.io".to_string(),
                team: None,
            },
            calendar_invitees: Vec::new(),
            default_summary: None,
            transcript: None,
            action_items: None,
            crm_matches: None,
            crm_matches_error: None,
        }
    }

    fn utterance(speaker: &str, timestamp: &str, text: &str) -> TranscriptEntry {
        TranscriptEntry {
            speaker: Speaker {
                display_name: speaker.to_string(),
                matched_calendar_invitee_email: None,
            },
            text: text.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn transcript_snippet_carries_timestamp_and_speaker() {
        let mut m = meeting(1, "Planning");
        m.transcript = Some(vec![utterance(
            "Dana",
            "00:12:34",
            "...we need to revisit the budget plan before Friday...",
        )]);

        let report = search_meetings(&[m], "budget", 10);
        assert_eq!(report.matches.len(), 1);
        let found = &report.matches[0];
        assert!(found.transcript_match);
        assert!(!found.title_match);
        let snippet = &found.snippets[0];
        assert!(snippet.starts_with("[00:12:34] Dana: ..."));
        assert!(snippet.contains("budget"));
    }

    #[test]
    fn long_utterance_is_clipped_on_both_sides() {
        let text = format!("{} budget {}", "a".repeat(80), "b".repeat(80));
        let mut m = meeting(1, "Planning");
        m.transcript = Some(vec![utterance("Kim", "00:01:00", &text)]);

        let report = search_meetings(&[m], "budget", 10);
        let snippet = &report.matches[0].snippets[0];
        let body = snippet
            .strip_prefix("[00:01:00] Kim: ")
            .expect("labeled snippet");
        assert!(body.starts_with("..."));
        assert!(body.ends_with("..."));
        // 50 context chars + 6 match chars + 50 context chars + two markers.
        assert_eq!(body.chars().count(), 3 + 50 + 6 + 50 + 3);
    }

    #[test]
    fn case_fold_growth_keeps_the_window_on_the_match() {
        // Each 'İ' lowercases to two chars, so the folded text is longer
        // than the original.
        let text = format!("{} budget", "İ".repeat(60));
        let mut m = meeting(1, "Planning");
        m.transcript = Some(vec![utterance("Kim", "00:01:00", &text)]);

        let report = search_meetings(&[m], "budget", 10);
        let snippet = &report.matches[0].snippets[0];
        let body = snippet
            .strip_prefix("[00:01:00] Kim: ")
            .expect("labeled snippet");
        assert!(body.starts_with("..."));
        assert!(body.ends_with("budget"));
        // 50 context chars + 6 match chars + the leading marker.
        assert_eq!(body.chars().count(), 3 + 50 + 6);
    }

    #[test]
    fn short_utterance_is_not_clipped() {
        let mut m = meeting(1, "Planning");
        m.transcript = Some(vec![utterance("Kim", "00:01:00", "the budget is fine")]);

        let report = search_meetings(&[m], "budget", 10);
        assert_eq!(
            report.matches[0].snippets[0],
            "[00:01:00] Kim: the budget is fine"
        );
    }

    #[test]
    fn title_matches_are_case_insensitive() {
        let m = meeting(1, "Q3 BUDGET Review");
        let report = search_meetings(&[m], "budget", 10);
        assert!(report.matches[0].title_match);
        assert!(report.matches[0].snippets.is_empty());
    }

    #[test]
    fn calendar_event_title_also_matches() {
        let mut m = meeting(1, "Weekly Sync");
        m.meeting_title = Some("Budget deep dive".to_string());
        let report = search_meetings(&[m], "budget", 10);
        assert!(report.matches[0].title_match);
    }

    #[test]
    fn snippet_cap_spans_transcript_and_summary() {
        let mut m = meeting(1, "Planning");
        m.transcript = Some(vec![
            utterance("A", "00:01:00", "budget point one"),
            utterance("B", "00:02:00", "budget point two"),
            utterance("C", "00:03:00", "budget point three"),
            utterance("D", "00:04:00", "budget point four"),
        ]);
        m.default_summary = Some(Summary {
            template_name: Some("general".to_string()),
            markdown_formatted: Some("The budget was discussed at length.".to_string()),
        });

        let report = search_meetings(&[m], "budget", 10);
        let found = &report.matches[0];
        assert_eq!(found.snippets.len(), MAX_SNIPPETS_PER_MEETING);
        // Summary still counts as matched even though its snippet was
        // squeezed out by the cap.
        assert!(found.summary_match);
        assert!(found.snippets.iter().all(|s| !s.starts_with("[Summary]")));
    }

    #[test]
    fn summary_snippet_is_labeled() {
        let mut m = meeting(1, "Planning");
        m.default_summary = Some(Summary {
            template_name: None,
            markdown_formatted: Some("Key decision: the budget moves to Q4.".to_string()),
        });

        let report = search_meetings(&[m], "budget", 10);
        let found = &report.matches[0];
        assert!(found.summary_match);
        assert!(found.snippets[0].starts_with("[Summary] "));
        assert!(found.snippets[0].contains("budget"));
    }

    #[test]
    fn non_matching_meetings_are_excluded() {
        let m1 = meeting(1, "Budget review");
        let m2 = meeting(2, "Standup");
        let report = search_meetings(&[m1, m2], "budget", 10);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].recording_id, 1);
    }

    #[test]
    fn early_stop_at_limit_keeps_total_searched_full() {
        let meetings = vec![
            meeting(1, "Budget A"),
            meeting(2, "Budget B"),
            meeting(3, "Budget C"),
        ];
        let report = search_meetings(&meetings, "budget", 1);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].recording_id, 1);
        assert_eq!(report.total_searched, 3);
    }

    #[test]
    fn absent_transcript_never_matches() {
        // transcript: None means not fetched, not empty.
        let m = meeting(1, "Standup");
        let report = search_meetings(&[m], "budget", 10);
        assert!(report.matches.is_empty());
        assert_eq!(report.total_searched, 1);
    }
}
