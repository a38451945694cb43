//! Aggregate statistics over a fetched meeting collection.
//!
//! Both computations run on the fully-aggregated collection, never on
//! individual pages. Empty collections produce `None` (a soft no-data
//! signal), so callers render "no meetings found" instead of erroring and
//! the mean can never divide by zero.

use std::collections::HashMap;

use mynah_core::models::{DomainType, Meeting};
use serde::Serialize;

/// Bucket label for recorders without a team.
pub const NO_TEAM_LABEL: &str = "No Team";

/// Duration aggregates in whole minutes.
#[derive(Debug, Clone, Serialize)]
pub struct DurationStats {
    /// Mean, rounded to the nearest whole minute.
    pub mean_minutes: i64,
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub total_minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamCount {
    pub team: String,
    pub count: usize,
}

/// Meeting-level statistics report.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingStats {
    pub total_meetings: usize,
    /// Meetings whose invitees are all inside the organization.
    pub internal_meetings: usize,
    /// total - internal, by definition.
    pub external_meetings: usize,
    pub duration: DurationStats,
    /// Meeting counts by recorder team, descending.
    pub by_team: Vec<TeamCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonCount {
    pub name: String,
    pub email: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}

/// Participant-level frequency report.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStats {
    pub total_meetings: usize,
    /// Distinct invitees across the collection, before any limit is applied.
    pub unique_participants: usize,
    pub top_participants: Vec<PersonCount>,
    pub top_recorders: Vec<PersonCount>,
    pub top_domains: Vec<DomainCount>,
}

/// Compute duration, team, and internal/external statistics.
///
/// Returns `None` on an empty collection.
pub fn compute_meeting_stats(meetings: &[Meeting]) -> Option<MeetingStats> {
    if meetings.is_empty() {
        return None;
    }

    let durations: Vec<i64> = meetings.iter().map(Meeting::duration_minutes).collect();
    let total_minutes: i64 = durations.iter().sum();
    let mean_minutes = (total_minutes as f64 / durations.len() as f64).round() as i64;
    let min_minutes = *durations.iter().min().unwrap_or(&0);
    let max_minutes = *durations.iter().max().unwrap_or(&0);

    // Insertion-order table so equal counts keep a deterministic first-seen
    // order after the stable sort.
    let mut team_index: HashMap<String, usize> = HashMap::new();
    let mut by_team: Vec<TeamCount> = Vec::new();
    for meeting in meetings {
        let team = meeting
            .recorded_by
            .team
            .clone()
            .unwrap_or_else(|| NO_TEAM_LABEL.to_string());
        match team_index.get(&team) {
            Some(&i) => by_team[i].count += 1,
            None => {
                team_index.insert(team.clone(), by_team.len());
                by_team.push(TeamCount { team, count: 1 });
            }
        }
    }
    by_team.sort_by(|a, b| b.count.cmp(&a.count));

    let internal_meetings = meetings
        .iter()
        .filter(|m| m.calendar_invitees_domain_type == DomainType::InternalOnly)
        .count();

    Some(MeetingStats {
        total_meetings: meetings.len(),
        internal_meetings,
        external_meetings: meetings.len() - internal_meetings,
        duration: DurationStats {
            mean_minutes,
            min_minutes,
            max_minutes,
            total_minutes,
        },
        by_team,
    })
}

/// Compute participant, recorder, and domain frequency tables.
///
/// Emails are keyed lowercased; the first-seen display name and original-case
/// email are the ones reported. Each table is sorted descending by count
/// (ties first-seen) and truncated to `limit`. Returns `None` on an empty
/// collection.
pub fn compute_participant_stats(meetings: &[Meeting], limit: usize) -> Option<ParticipantStats> {
    if meetings.is_empty() {
        return None;
    }

    let mut participant_index: HashMap<String, usize> = HashMap::new();
    let mut participants: Vec<PersonCount> = Vec::new();
    let mut domain_index: HashMap<String, usize> = HashMap::new();
    let mut domains: Vec<DomainCount> = Vec::new();
    let mut recorder_index: HashMap<String, usize> = HashMap::new();
    let mut recorders: Vec<PersonCount> = Vec::new();

    for meeting in meetings {
        for invitee in &meeting.calendar_invitees {
            let email_key = invitee.email.to_lowercase();
            match participant_index.get(&email_key) {
                Some(&i) => participants[i].count += 1,
                None => {
                    participant_index.insert(email_key, participants.len());
                    participants.push(PersonCount {
                        name: invitee.name.clone(),
                        email: invitee.email.clone(),
                        count: 1,
                    });
                }
            }

            let domain_key = invitee.email_domain.to_lowercase();
            match domain_index.get(&domain_key) {
                Some(&i) => domains[i].count += 1,
                None => {
                    domain_index.insert(domain_key.clone(), domains.len());
                    domains.push(DomainCount {
                        domain: domain_key,
                        count: 1,
                    });
                }
            }
        }

        let recorder_key = meeting.recorded_by.email.to_lowercase();
        match recorder_index.get(&recorder_key) {
            Some(&i) => recorders[i].count += 1,
            None => {
                recorder_index.insert(recorder_key, recorders.len());
                recorders.push(PersonCount {
                    name: meeting.recorded_by.name.clone(),
                    email: meeting.recorded_by.email.clone(),
                    count: 1,
                });
            }
        }
    }

    let unique_participants = participants.len();

    participants.sort_by(|a, b| b.count.cmp(&a.count));
    recorders.sort_by(|a, b| b.count.cmp(&a.count));
    domains.sort_by(|a, b| b.count.cmp(&a.count));

    participants.truncate(limit);
    recorders.truncate(limit);
    domains.truncate(limit);

    Some(ParticipantStats {
        total_meetings: meetings.len(),
        unique_participants,
        top_participants: participants,
        top_recorders: recorders,
        top_domains: domains,
    })
}
