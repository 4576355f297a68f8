//! Tests for the HTTP routes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use strictly_scoreboard::{MatchService, router};

fn app() -> Router {
    router(MatchService::new(None, 50, 64))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create(app: &Router) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/matches",
        Some(json!({ "team_a_name": "Lions", "team_b_name": "Tigers" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_create_and_fetch_match() {
    let app = app();
    let created = create(&app).await;
    assert_eq!(created["team_a_name"], "Lions");
    assert_eq!(created["match_type"], "singles");
    assert_eq!(created["best_of"], 3);
    assert_eq!(created["score_state"]["serving"], 0);

    let id = created["id"].as_str().expect("id");
    let (status, fetched) = send(&app, "GET", &format!("/api/matches/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let code = created["share_code"].as_str().expect("share code");
    let (status, shared) = send(&app, "GET", &format!("/api/matches/share/{code}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shared["id"], created["id"]);

    let (status, listed) = send(&app, "GET", "/api/matches", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_score_point_returns_mutation_body() {
    let app = app();
    let created = create(&app).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/matches/{id}/score"),
        Some(json!({ "team": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["match"]["score_state"]["points"], json!([0, 1]));
    assert_eq!(body["match"]["undo_available"], 1);
}

#[tokio::test]
async fn test_invalid_team_rejected() {
    let app = app();
    let created = create(&app).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/matches/{id}/score"),
        Some(json!({ "team": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().expect("detail").contains("Invalid side"));
}

#[tokio::test]
async fn test_unknown_match_is_404() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/matches/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());

    let (status, _) = send(&app, "POST", "/api/matches/missing/undo", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/ws/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_undo_without_history_is_400() {
    let app = app();
    let created = create(&app).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(&app, "POST", &format!("/api/matches/{id}/undo"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Nothing to undo");
}

#[tokio::test]
async fn test_game_shortcut_during_tiebreak_is_409() {
    let app = app();
    let created = create(&app).await;
    let id = created["id"].as_str().expect("id");
    let game_uri = format!("/api/matches/{id}/game");

    for i in 0..12 {
        let (status, _) = send(&app, "POST", &game_uri, Some(json!({ "team": i % 2 }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(&app, "POST", &game_uri, Some(json!({ "team": 0 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reset_after_win() {
    let app = app();
    let created = create(&app).await;
    let id = created["id"].as_str().expect("id");
    let game_uri = format!("/api/matches/{id}/game");

    let mut last = Value::Null;
    for _ in 0..12 {
        let (_, body) = send(&app, "POST", &game_uri, Some(json!({ "team": 0 }))).await;
        last = body;
    }
    assert_eq!(last["match"]["score_state"]["winner"], 0);
    assert!(last["match"]["finished_at"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/matches/{id}/score"),
        Some(json!({ "team": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", &format!("/api/matches/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["match"]["score_state"]["winner"].is_null());
    assert_eq!(body["match"]["undo_available"], 0);
}

#[tokio::test]
async fn test_best_of_five_rejected() {
    let app = app();
    let (status, _) = send(&app, "POST", "/api/matches", Some(json!({ "best_of": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
