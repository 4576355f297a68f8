//! HTTP and WebSocket API for scorers and viewers.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_new::new;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use strictly_tennis::{ScoringError, Side};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, instrument, warn};

use crate::broadcast::ScoreUpdate;
use crate::record::{MatchRecord, MatchView, NewMatch};
use crate::service::{MatchError, MatchService};

/// Builds the API router.
pub fn router(service: MatchService) -> Router {
    Router::new()
        .route("/api/matches", get(list_matches).post(create_match))
        .route("/api/matches/{id}", get(get_match))
        .route("/api/matches/share/{code}", get(get_by_share_code))
        .route("/api/matches/{id}/score", post(score_point))
        .route("/api/matches/{id}/game", post(score_game))
        .route("/api/matches/{id}/undo", post(undo))
        .route("/api/matches/{id}/reset", post(reset))
        .route("/ws/{id}", get(live))
        .with_state(service)
}

/// Body of the score and game routes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Side to credit: 0 for A, 1 for B.
    pub team: i64,
}

/// Body returned by every route that changes a match.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct MutationResponse {
    /// Always true; failures use an error body instead.
    pub success: bool,
    /// The match after the change.
    #[serde(rename = "match")]
    pub match_view: MatchView,
}

/// Body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// What went wrong.
    pub detail: String,
}

impl MatchError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyFinished | Self::NothingToUndo | Self::UnsupportedBestOf(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Scoring(ScoringError::InvalidSide(_)) => StatusCode::BAD_REQUEST,
            Self::Scoring(ScoringError::TiebreakInProgress) => StatusCode::CONFLICT,
            Self::Scoring(ScoringError::InvariantViolation(_)) | Self::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for MatchError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn changed(record: MatchRecord) -> Json<MutationResponse> {
    Json(MutationResponse::new(true, MatchView::from(&record)))
}

#[instrument(skip(service, new))]
async fn create_match(
    State(service): State<MatchService>,
    Json(new): Json<NewMatch>,
) -> Result<(StatusCode, Json<MatchView>), MatchError> {
    let record = service.create_match(new).await?;
    Ok((StatusCode::CREATED, Json(MatchView::from(&record))))
}

#[instrument(skip(service))]
async fn list_matches(State(service): State<MatchService>) -> Json<Vec<MatchView>> {
    let views = service
        .list_matches()
        .await
        .iter()
        .map(MatchView::from)
        .collect();
    Json(views)
}

#[instrument(skip(service))]
async fn get_match(
    State(service): State<MatchService>,
    Path(id): Path<String>,
) -> Result<Json<MatchView>, MatchError> {
    let record = service.get_match(&id).await?;
    Ok(Json(MatchView::from(&record)))
}

#[instrument(skip(service))]
async fn get_by_share_code(
    State(service): State<MatchService>,
    Path(code): Path<String>,
) -> Result<Json<MatchView>, MatchError> {
    let record = service.get_by_share_code(&code).await?;
    Ok(Json(MatchView::from(&record)))
}

#[instrument(skip(service))]
async fn score_point(
    State(service): State<MatchService>,
    Path(id): Path<String>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<MutationResponse>, MatchError> {
    let side = Side::try_from(request.team)?;
    Ok(changed(service.score_point(&id, side).await?))
}

#[instrument(skip(service))]
async fn score_game(
    State(service): State<MatchService>,
    Path(id): Path<String>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<MutationResponse>, MatchError> {
    let side = Side::try_from(request.team)?;
    Ok(changed(service.score_game(&id, side).await?))
}

#[instrument(skip(service))]
async fn undo(
    State(service): State<MatchService>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, MatchError> {
    Ok(changed(service.undo(&id).await?))
}

#[instrument(skip(service))]
async fn reset(
    State(service): State<MatchService>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, MatchError> {
    Ok(changed(service.reset(&id).await?))
}

/// Upgrades to a live feed of one match. Unknown matches get a 404 before
/// any upgrade is attempted.
#[instrument(skip(service, ws))]
async fn live(
    State(service): State<MatchService>,
    Path(id): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let (initial, rx) = match service.subscribe(&id).await {
        Ok(subscription) => subscription,
        Err(e) => return e.into_response(),
    };
    match ws {
        Ok(ws) => {
            info!(match_id = %id, "Viewer connected");
            ws.on_upgrade(move |socket| live_socket(socket, initial, rx))
        }
        Err(rejection) => rejection.into_response(),
    }
}

/// Sends `initial`, then every update from `rx`, until either side closes.
/// Client messages are ignored.
async fn live_socket<S, E>(
    mut socket: S,
    initial: ScoreUpdate,
    mut rx: broadcast::Receiver<ScoreUpdate>,
) where
    S: Sink<Message, Error = E> + Stream<Item = Result<Message, E>> + Unpin,
{
    if !send_update(&mut socket, &initial).await {
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    if !send_update(&mut socket, &update).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Viewer lagged behind, skipping ahead");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },
        }
    }
    debug!("Viewer disconnected");
}

/// Returns false once the socket can no longer be written to.
async fn send_update<S, E>(socket: &mut S, update: &ScoreUpdate) -> bool
where
    S: Sink<Message, Error = E> + Unpin,
{
    let payload = match serde_json::to_string(update) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Failed to encode score update");
            return true;
        }
    };
    socket.send(Message::Text(payload.into())).await.is_ok()
}
