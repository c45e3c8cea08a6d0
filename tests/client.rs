use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use sentry_events_client::*;
use serde_json::json;
use test_log::test;

fn client(server: &MockServer) -> SentryClient {
    SentryClient::new(&Config::new(server.base_url()).with_token("secret")).unwrap()
}

fn event_body() -> serde_json::Value {
    json!({
        "eventID": "abc",
        "id": "abc",
        "groupID": "77",
        "platform": "python",
        "size": 1234,
        "dateCreated": "2024-05-01T10:00:00.123Z",
        "tags": [{"key": "environment", "value": "prod"}],
        "entries": [
            {"type": "message", "data": {"formatted": "Something broke"}},
            {"type": "stacktrace", "data": {"frames": [
                {"filename": "app.py", "function": "handler", "lineNo": 12, "inApp": true}
            ]}}
        ]
    })
}

#[test(tokio::test)]
async fn project_event_decodes_entries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/projects/acme/web/events/abc/")
                .header("authorization", "Bearer secret");
            then.status(200).json_body(event_body());
        })
        .await;

    let event = client(&server)
        .get_project_event("acme", "web", "abc")
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(event.event_id.as_deref(), Some("abc"));
    assert_eq!(event.size, Some(1234));
    assert_eq!(event.tag("environment"), Some("prod"));
    assert_eq!(event.entries.len(), 2);

    let Interface::Message(message) = event.entries[0].interface().unwrap() else {
        panic!("first entry should be a message");
    };
    assert_eq!(message.formatted.as_deref(), Some("Something broke"));

    let Interface::Stacktrace(stacktrace) = event.entries[1].interface().unwrap() else {
        panic!("second entry should be a stacktrace");
    };
    assert_eq!(stacktrace.frames[0].function.as_deref(), Some("handler"));
    assert_eq!(stacktrace.frames[0].line_no, Some(12));
    assert_eq!(stacktrace.frames[0].in_app, Some(true));
}

#[test(tokio::test)]
async fn latest_and_oldest_event_of_issue() {
    let server = MockServer::start_async().await;
    let latest = server
        .mock_async(|when, then| {
            when.method(GET).path("/issues/77/events/latest/");
            then.status(200).json_body(json!({"eventID": "new"}));
        })
        .await;
    let oldest = server
        .mock_async(|when, then| {
            when.method(GET).path("/issues/77/events/oldest/");
            then.status(200).json_body(json!({"eventID": "old"}));
        })
        .await;

    let client = client(&server);
    let newest = client.get_latest_event("77").await.unwrap();
    let first = client.get_oldest_event("77").await.unwrap();

    latest.assert_async().await;
    oldest.assert_async().await;
    assert_eq!(newest.event_id.as_deref(), Some("new"));
    assert_eq!(first.event_id.as_deref(), Some("old"));
}

#[test(tokio::test)]
async fn events_filter_goes_into_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/events/")
                .query_param("utc", "true")
                .query_param("project", "web")
                .query_param("field", "title")
                .query_param("per_page", "10");
            then.status(200).json_body(json!({
                "data": [{"title": "boom", "count()": 3}],
                "meta": {"fields": {"title": "string"}}
            }));
        })
        .await;

    let events = client(&server)
        .get_events(
            "acme",
            &EventsRequest {
                utc: true,
                project: vec!["web".into()],
                field: vec!["title".into()],
                per_page: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(events.data.len(), 1);
    assert_eq!(events.data[0]["title"], json!("boom"));
    assert_eq!(events.meta, Some(json!({"fields": {"title": "string"}})));
}

#[test(tokio::test)]
async fn all_events_follows_cursors_in_order() {
    let server = MockServer::start_async().await;
    let next_link = format!(
        "<{}>; rel=\"previous\"; results=\"false\"; cursor=\"0:0:1\", <{}>; rel=\"next\"; results=\"true\"; cursor=\"0:2:0\"",
        server.url("/organizations/acme/events/?cursor=0:0:1"),
        server.url("/organizations/acme/events/?cursor=0:2:0"),
    );
    let last_link = format!(
        "<{}>; rel=\"previous\"; results=\"true\"; cursor=\"0:0:1\", <{}>; rel=\"next\"; results=\"false\"; cursor=\"0:4:0\"",
        server.url("/organizations/acme/events/?cursor=0:0:1"),
        server.url("/organizations/acme/events/?cursor=0:4:0"),
    );

    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/events/")
                .query_param("cursor", "0:0:0");
            then.status(200)
                .header("link", next_link.as_str())
                .json_body(json!({"data": [{"id": "1"}, {"id": "2"}], "meta": {"page": 1}}));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/events/")
                .query_param("cursor", "0:2:0");
            then.status(200)
                .header("link", last_link.as_str())
                .json_body(json!({"data": [{"id": "3"}], "meta": {"page": 2}}));
        })
        .await;

    let events = client(&server)
        .get_all_events(
            "acme",
            &EventsRequest {
                cursor: Some("0:0:0".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<_> = events.data.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!("1"), json!("2"), json!("3")]);
    assert_eq!(events.meta, Some(json!({"page": 1})));
}

#[test(tokio::test)]
async fn all_events_stops_when_cursor_repeats() {
    let server = MockServer::start_async().await;
    let stuck_link = "<http://x/?cursor=0:1:0>; rel=\"next\"; results=\"true\"; cursor=\"0:1:0\"";

    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/events/")
                .query_param("cursor", "0:0:0");
            then.status(200)
                .header("link", stuck_link)
                .json_body(json!({"data": [{"id": "1"}]}));
        })
        .await;
    let repeated = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/events/")
                .query_param("cursor", "0:1:0");
            then.status(200)
                .header("link", stuck_link)
                .json_body(json!({"data": [{"id": "2"}]}));
        })
        .await;

    let events = client(&server)
        .get_all_events(
            "acme",
            &EventsRequest {
                cursor: Some("0:0:0".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(first.hits_async().await, 1);
    assert_eq!(repeated.hits_async().await, 1);
    let ids: Vec<_> = events.data.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!("1"), json!("2")]);
}

#[test(tokio::test)]
async fn events_page_exposes_link() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/organizations/acme/events/");
            then.status(200)
                .header(
                    "link",
                    "<http://x/?cursor=0:100:0>; rel=\"next\"; results=\"true\"; cursor=\"0:100:0\"",
                )
                .json_body(json!({"data": []}));
        })
        .await;

    let (events, link) = client(&server)
        .get_events_page("acme", &EventsRequest::default())
        .await
        .unwrap();

    assert!(events.data.is_empty());
    assert_eq!(link.next_cursor(), Some("0:100:0"));
    assert_eq!(link.previous, None);
}

#[test(tokio::test)]
async fn events_stats_by_series() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/organizations/acme/events-stats/")
                .query_param("excludeOther", "1")
                .query_param("partial", "0")
                .query_param("per_page", "50")
                .query_param("yAxis", "count()");
            then.status(200).json_body(json!({
                "count()": {
                    "data": [[1000, [{"count": 5}]], [2000, [{"count": 7}]]],
                    "order": 0,
                    "isMetricsData": false,
                    "start": 1000,
                    "end": 2000,
                    "meta": {"isMetricsData": false}
                },
                "count_unique(user)": {
                    "data": [[1000, [{"count": 1}]], [2000, [{"count": 2}]]],
                    "order": 1
                }
            }));
        })
        .await;

    let stats = client(&server)
        .get_events_stats(
            "acme",
            &EventsStatsRequest {
                exclude_other: true,
                partial: false,
                per_page: Some(50),
                y_axis: vec!["count()".into(), "count_unique(user)".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(stats.len(), 2);
    let count = &stats["count()"];
    assert_eq!(
        count.data,
        vec![
            EventStatsPoint {
                timestamp: 1000,
                values: vec![EventStatsPointValue {
                    count: Some(serde_json::Number::from(5u64))
                }],
            },
            EventStatsPoint {
                timestamp: 2000,
                values: vec![EventStatsPointValue {
                    count: Some(serde_json::Number::from(7u64))
                }],
            },
        ]
    );
    assert_eq!(stats["count_unique(user)"].order, Some(1));
}

#[test(tokio::test)]
async fn events_stats_single_series() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/organizations/acme/events-stats/");
            then.status(200).json_body(json!({
                "data": [[1000, [{"count": 4}]]],
                "confidence": [[1000, [{"count": "high"}]]],
                "start": 1000,
                "end": 2000
            }));
        })
        .await;

    let stats = client(&server)
        .get_events_stats(
            "acme",
            &EventsStatsRequest {
                y_axis: vec!["count()".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let set = &stats["count()"];
    assert_eq!(set.total(), 4.0);
    assert_eq!(set.confidence[0].values[0].count(), Some("high"));
}

#[test(tokio::test)]
async fn bad_stats_point_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/organizations/acme/events-stats/");
            then.status(200)
                .json_body(json!({"count()": {"data": [[1000, [{"count": 1}], 3]]}}));
        })
        .await;

    let err = client(&server)
        .get_events_stats("acme", &EventsStatsRequest::default())
        .await
        .unwrap_err();

    match err {
        Error::Decode { path, source } => {
            assert_eq!(path, "organizations/acme/events-stats/");
            assert!(source.to_string().contains("invalid length 3"), "{source}");
            assert!(source.to_string().contains("series \"count()\""), "{source}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test(tokio::test)]
async fn http_errors_propagate() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/issues/404/events/latest/");
            then.status(404).body("{\"detail\": \"The requested resource does not exist\"}");
        })
        .await;

    let err = client(&server).get_latest_event("404").await.unwrap_err();

    match err {
        Error::Status { status, path, body } => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert_eq!(path, "issues/404/events/latest/");
            assert!(body.contains("does not exist"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test(tokio::test)]
async fn transport_errors_propagate() {
    let client = SentryClient::with_client(reqwest::Client::new(), "http://127.0.0.1:1/");
    let err = client.get_oldest_event("1").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
