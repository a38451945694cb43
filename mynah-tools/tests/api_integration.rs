//! Integration tests for the API client and tools against a stubbed HTTP
//! server. Covers the pagination ceiling, the error taxonomy, the bracketed
//! array wire format, and full tool round-trips.

use std::sync::Arc;

use mynah_core::config::MynahConfig;
use mynah_core::error::{ApiError, ToolError};
use mynah_tools::client::{MeetingFilters, MynahClient, MAX_PAGES};
use mynah_tools::insights::{MeetingStatsTool, SearchMeetingsTool};
use mynah_tools::meetings::GetSummaryTool;
use mynah_tools::registry::Tool;
use mynah_tools::webhooks::{CreateWebhookTool, DeleteWebhookTool};
use serde_json::{json, Value};
use wiremock::matchers::{
    body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TEST_KEY: &str = "mk_test_key";

fn client_for(server: &MockServer) -> Arc<MynahClient> {
    let config = MynahConfig {
        api_key: TEST_KEY.to_string(),
        base_url: server.uri(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    };
    Arc::new(MynahClient::new(&config).unwrap())
}

fn meeting_json(id: u64, team: Option<&str>, domain_type: &str, end: &str) -> Value {
    json!({
        "recording_id": id,
        "title": format!("Meeting {id}"),
        "url": format!("https://app.mynah.dev/calls/{id}"),
        "created_at": "2025-03-10T15:02:11Z",
        "scheduled_start_time": "2025-03-10T14:00:00Z",
        "scheduled_end_time": "2025-03-10T15:00:00Z",
        "recording_start_time": "2025-03-10T14:00:00Z",
        "recording_end_time": end,
        "calendar_invitees_domain_type": domain_type,
        "recorded_by": {
            "name": format!("Recorder {id}"),
            "email": format!("recorder{id}@acme.io"),
            "email_domain": "acme.io",
            "team": team,
        },
        "calendar_invitees": [
            {
                "name": "Dana Voss",
                "email": "dana@client.com",
                "email_domain": "client.com",
                "is_external": true
            }
        ]
    })
}

fn page_json(items: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "limit": 10,
        "next_cursor": next_cursor,
        "items": items,
    })
}

/// Matches the raw, undecoded query string byte-for-byte.
struct RawQuery(&'static str);

impl wiremock::Match for RawQuery {
    fn matches(&self, request: &Request) -> bool {
        request.url.query() == Some(self.0)
    }
}

#[tokio::test]
async fn aggregation_stops_at_the_page_ceiling() {
    let server = MockServer::start().await;

    // First fetch carries no cursor and hands out cursor "c1".
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![meeting_json(1, None, "internal_only", "2025-03-10T14:30:00Z")],
            Some("c1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Cursors c1..=c10 each hand out the next one; only c1..=c9 should be
    // followed before the ceiling cuts the loop at 10 fetches total.
    for i in 1..=10 {
        let expected = if i <= 9 { 1 } else { 0 };
        Mock::given(method("GET"))
            .and(path("/meetings"))
            .and(query_param("cursor", format!("c{i}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![meeting_json(
                    i + 1,
                    None,
                    "internal_only",
                    "2025-03-10T14:30:00Z",
                )],
                Some(&format!("c{}", i + 1)),
            )))
            .expect(expected)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let meetings = client
        .list_all_meetings(&MeetingFilters::default())
        .await
        .unwrap();

    assert_eq!(meetings.len(), MAX_PAGES);
    server.verify().await;
}

#[tokio::test]
async fn aggregation_ends_cleanly_when_the_cursor_runs_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                meeting_json(1, None, "internal_only", "2025-03-10T14:30:00Z"),
                meeting_json(2, None, "internal_only", "2025-03-10T14:30:00Z"),
            ],
            Some("last"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param("cursor", "last"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![meeting_json(3, None, "internal_only", "2025-03-10T14:30:00Z")],
            None,
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let meetings = client
        .list_all_meetings(&MeetingFilters::default())
        .await
        .unwrap();

    // Order preserved across pages.
    let ids: Vec<u64> = meetings.iter().map(|m| m.recording_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn a_failing_page_aborts_the_whole_aggregation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![meeting_json(1, None, "internal_only", "2025-03-10T14:30:00Z")],
            Some("c1"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .list_all_meetings(&MeetingFilters::default())
        .await
        .unwrap_err();

    // No partial results: the whole call fails with the page's failure.
    assert!(matches!(err, ApiError::RemoteUnavailable { status: 503 }));
}

#[tokio::test]
async fn array_filters_go_on_the_wire_as_repeated_bracketed_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(RawQuery("teams[]=Sales&teams[]=Eng"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let filters = MeetingFilters {
        teams: vec!["Sales".to_string(), "Eng".to_string()],
        ..MeetingFilters::default()
    };
    client.list_meetings(&filters, None).await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn every_request_carries_the_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams"))
        .and(header("x-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "limit": 10,
            "next_cursor": null,
            "items": [{"name": "Sales", "created_at": "2025-01-05T09:00:00Z"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.list_teams(None).await.unwrap();
    assert_eq!(page.items[0].name, "Sales");

    server.verify().await;
}

#[tokio::test]
async fn http_statuses_map_onto_the_error_taxonomy() {
    let cases: Vec<(u16, fn(&ApiError) -> bool)> = vec![
        (401, |e| matches!(e, ApiError::AuthenticationFailed)),
        (403, |e| matches!(e, ApiError::Forbidden)),
        (404, |e| matches!(e, ApiError::NotFound { .. })),
        (500, |e| {
            matches!(e, ApiError::RemoteUnavailable { status: 500 })
        }),
        (503, |e| {
            matches!(e, ApiError::RemoteUnavailable { status: 503 })
        }),
    ];

    for (status, check) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meetings"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .list_meetings(&MeetingFilters::default(), None)
            .await
            .unwrap_err();
        assert!(check(&err), "status {status} mapped to {err:?}");
    }
}

#[tokio::test]
async fn bad_request_carries_the_remote_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "created_after is not a valid timestamp"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .list_meetings(&MeetingFilters::default(), None)
        .await
        .unwrap_err();

    match err {
        ApiError::InvalidRequest { message } => {
            assert_eq!(message, "created_after is not a valid timestamp");
        }
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_reads_the_retry_after_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .list_meetings(&MeetingFilters::default(), None)
        .await
        .unwrap_err();

    match err {
        ApiError::RateLimited { retry_after_secs } => {
            assert_eq!(retry_after_secs, Some(30));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert!(err.to_string().contains("retry after 30s"));
}

#[tokio::test]
async fn meeting_stats_tool_aggregates_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                meeting_json(1, Some("Sales"), "internal_only", "2025-03-10T14:30:00Z"),
                meeting_json(2, Some("Sales"), "has_external", "2025-03-10T14:45:00Z"),
            ],
            Some("p2"),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![meeting_json(3, None, "internal_only", "2025-03-10T15:00:00Z")],
            None,
        )))
        .mount(&server)
        .await;

    let tool = MeetingStatsTool::new(client_for(&server));
    let output = tool.execute(json!({})).await.unwrap();

    assert!(!output.is_error());
    assert!(output.content.contains("**Total meetings:** 3"));
    assert!(output.content.contains("**Internal:** 2 | **External:** 1"));
    assert!(output.content.contains("| Sales | 2 |"));
    assert!(output.content.contains("| No Team | 1 |"));
    // 30 + 45 + 60 minutes.
    assert!(output.content.contains("**Total:** 135 min"));
}

#[tokio::test]
async fn stats_tool_reports_no_data_instead_of_erroring() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], None)))
        .mount(&server)
        .await;

    let tool = MeetingStatsTool::new(client_for(&server));
    let output = tool.execute(json!({})).await.unwrap();

    assert!(!output.is_error());
    assert!(output.content.contains("No meetings found"));
}

#[tokio::test]
async fn search_tool_forces_transcript_and_summary_inclusion() {
    let server = MockServer::start().await;

    let mut item = meeting_json(1, None, "internal_only", "2025-03-10T14:30:00Z");
    item["transcript"] = json!([{
        "speaker": {"display_name": "Dana"},
        "text": "we need to revisit the budget plan before Friday",
        "timestamp": "00:12:34"
    }]);

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .and(query_param("include_transcript", "true"))
        .and(query_param("include_summary", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![item], None)))
        .expect(1)
        .mount(&server)
        .await;

    let tool = SearchMeetingsTool::new(client_for(&server));
    let output = tool.execute(json!({"query": "budget"})).await.unwrap();

    assert!(output.content.contains("[00:12:34] Dana:"));
    assert!(output.content.contains("budget"));
    assert_eq!(output.metadata["total_searched"], json!(1));

    server.verify().await;
}

#[tokio::test]
async fn summary_not_found_surfaces_the_taxonomy_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recordings/42/summary"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tool = GetSummaryTool::new(client_for(&server));
    let err = tool.execute(json!({"recording_id": 42})).await.unwrap_err();

    match &err {
        ToolError::Api(ApiError::NotFound { resource }) => {
            assert_eq!(resource, "/recordings/42/summary");
        }
        other => panic!("expected pass-through NotFound, got {other:?}"),
    }
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn create_webhook_round_trips_and_reveals_the_secret_once() {
    let server = MockServer::start().await;

    let expected_body = json!({
        "destination_url": "https://hooks.acme.io/mynah",
        "triggered_for": ["my_recordings", "team_recordings"],
        "include_transcript": true,
        "include_summary": false,
        "include_action_items": false,
        "include_crm_matches": false,
    });

    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(header("x-api-key", TEST_KEY))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "wh_81",
            "destination_url": "https://hooks.acme.io/mynah",
            "secret": "whsec_only_once",
            "created_at": "2025-03-10T12:00:00Z",
            "include_transcript": true,
            "include_summary": false,
            "include_action_items": false,
            "include_crm_matches": false,
            "triggered_for": ["my_recordings", "team_recordings"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = CreateWebhookTool::new(client_for(&server));
    let output = tool
        .execute(json!({
            "destination_url": "https://hooks.acme.io/mynah",
            "triggered_for": ["my_recordings", "team_recordings"],
            "include_transcript": true,
        }))
        .await
        .unwrap();

    assert!(output.content.contains("wh_81"));
    assert!(output.content.contains("whsec_only_once"));
    assert!(output.content.contains("shown only once"));

    server.verify().await;
}

#[tokio::test]
async fn delete_webhook_confirms_on_204() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/wh_81"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tool = DeleteWebhookTool::new(client_for(&server));
    let output = tool
        .execute(json!({"webhook_id": "wh_81"}))
        .await
        .unwrap();

    assert!(output.content.contains("wh_81"));
    assert!(output.content.contains("deleted"));

    server.verify().await;
}

#[tokio::test]
async fn unreachable_host_maps_to_network_unreachable() {
    // Nothing is listening on this port.
    let config = MynahConfig {
        api_key: TEST_KEY.to_string(),
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 1,
    };
    let client = MynahClient::new(&config).unwrap();

    let err = client
        .list_meetings(&MeetingFilters::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::NetworkUnreachable { .. } | ApiError::Timeout { .. }
    ));
}
