mod common;

use std::rc::Rc;

use common::*;
use courtside_client::{
    ApiClient, CancellationToken, Diagnostic, RecordingSink, RequestOptions,
};
use courtside_shared::{ApiError, Endpoint, ServiceReply};
use serde_json::{json, Value};
use tokio::task::yield_now;

fn recording(transport: &FakeTransport) -> (ApiClient, Rc<RecordingSink>) {
    let sink = Rc::new(RecordingSink::default());
    let client = transport.client().with_diagnostics(sink.clone());
    (client, sink)
}

#[tokio::test]
async fn sends_json_headers_and_client_defaults() {
    let transport = FakeTransport::new();
    transport.json(GAMES_TODAY, json!({"scoreboard": {"games": []}}));
    let client = transport.client().with_header("X-Client", "courtside");

    let games = client
        .games_today(&CancellationToken::new())
        .await
        .unwrap();

    assert!(games.scoreboard.games.is_empty());
    let headers = &transport.calls()[0].headers;
    assert!(headers.contains(&("Accept".into(), "application/json".into())));
    assert!(headers.contains(&("Content-Type".into(), "application/json".into())));
    assert!(headers.contains(&("X-Client".into(), "courtside".into())));
}

#[tokio::test]
async fn per_call_headers_and_params_are_applied() {
    let transport = FakeTransport::new();
    transport.json(TEAM, json!([]));
    let client = transport.client().with_header("X-Season", "2024-25");

    client
        .request(
            Endpoint::Team,
            RequestOptions::new()
                .param("id", 1610612738u64)
                .opt_param::<String>("season", None)
                .param("matchup", "BOS vs. ORL")
                .header("x-season", "2023-24"),
        )
        .await
        .unwrap();

    let call = &transport.calls()[0];
    assert_eq!(
        call.url,
        format!("{BASE_URL}{TEAM}?id=1610612738&matchup=BOS%20vs.%20ORL")
    );
    assert!(call.headers.contains(&("X-Season".into(), "2023-24".into())));
}

#[tokio::test]
async fn non_success_status_maps_to_http_error_with_detail() {
    let transport = FakeTransport::new();
    transport.respond(
        INJURIES,
        503,
        r#"{"detail":"injury feed unavailable"}"#,
    );
    let (client, sink) = recording(&transport);

    let err = client
        .team_injuries(1610612738, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Http {
            status: 503,
            status_text: "Service Unavailable".into()
        }
    );
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    assert!(err.is_transport());

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], Diagnostic::Started { url } if url.contains(INJURIES)));
    assert!(matches!(
        &events[1],
        Diagnostic::Failed { detail: Some(detail), .. } if detail == "injury feed unavailable"
    ));
}

#[tokio::test]
async fn success_is_recorded_with_status() {
    let transport = FakeTransport::new();
    transport.json(TEAM_PLAYERS, roster_body(2));
    let (client, sink) = recording(&transport);

    let roster = client
        .team_players(1610612738, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(roster.len(), 2);
    assert!(matches!(
        sink.events().last(),
        Some(Diagnostic::Succeeded { status: 200, .. })
    ));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let transport = FakeTransport::new();
    transport.respond(GAMES_TODAY, 200, "<html>gateway</html>");
    let client = transport.client();

    let err = client
        .games_today(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Deserialize(_)));
}

#[tokio::test]
async fn empty_body_decodes_as_null() {
    let transport = FakeTransport::new();
    transport.respond(GAME_PREDICTION, 200, "");
    let client = transport.client();

    let value = client
        .request(Endpoint::GamePrediction, RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn cancelled_token_aborts_before_and_during_the_call() {
    let transport = FakeTransport::new();
    transport.json(TEAM_PLAYERS, roster_body(1));
    let (client, sink) = recording(&transport);

    let token = CancellationToken::new();
    token.cancel();
    let err = client.team_players(1, &token).await.unwrap_err();
    assert!(err.is_aborted());

    let held = transport.hold(TEAM_PLAYERS);
    let token = CancellationToken::new();
    let (result, _) = tokio::join!(client.team_players(1, &token), async {
        yield_now().await;
        token.cancel();
    });
    drop(held);

    assert_eq!(result.unwrap_err(), ApiError::Aborted);
    assert!(matches!(sink.events().last(), Some(Diagnostic::Aborted { .. })));
    assert!(!sink
        .events()
        .iter()
        .any(|e| matches!(e, Diagnostic::Failed { .. })));
}

#[tokio::test]
async fn batch_joins_ids_into_one_parameter() {
    let transport = FakeTransport::new();
    transport.json(
        BATCH_PREDICTIONS,
        json!({"predictions": {"1": 18.5, "2": {"error": "no data"}}}),
    );
    let client = transport.client();

    let reply = client
        .batch_predictions(&[1, 2], &CancellationToken::new())
        .await
        .unwrap();

    let batch = reply.ready().expect("ready reply");
    assert_eq!(batch[&1].value().map(|p| p.predicted_points), Some(18.5));
    assert_eq!(batch[&2].error(), Some("no data"));
    assert!(transport.calls()[0].url.ends_with("?player_ids=1%2C2"));
}

#[tokio::test]
async fn warming_sentinel_is_not_an_error() {
    let transport = FakeTransport::new();
    transport.json(GAME_PREDICTION, json!({"status": "Warming"}));
    let client = transport.client();

    let reply = client
        .game_prediction("0022400521", 1610612738, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply, ServiceReply::WarmingUp);
}

#[tokio::test]
async fn health_reads_status_bodies() {
    let transport = FakeTransport::new();
    transport
        .json("/health", json!({"status": "ok"}))
        .respond("/health", 500, "");
    let client = transport.client();

    assert!(client.health().await.unwrap());
    assert!(matches!(
        client.health().await,
        Err(ApiError::Http { status: 500, .. })
    ));
}
