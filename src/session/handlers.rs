use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::Session,
    types::{AddStatsRequest, PlayerResponse, SessionResponse, StatTypeResponse},
};
use crate::shared::{AppError, AppState};
use crate::stats::{PlayerStatsData, RecordKey, StatPatch};

/// GET /stat-types
#[instrument(name = "list_stat_types", skip(state))]
pub async fn list_stat_types(State(state): State<AppState>) -> Json<Vec<StatTypeResponse>> {
    let service = &state.session_service;
    let mut stat_types = Vec::new();
    for stat_type in service.registry().get_available() {
        stat_types.push(StatTypeResponse::build(service, stat_type.as_ref()).await);
    }
    Json(stat_types)
}

/// GET /sessions/:session_id
#[instrument(name = "get_session", skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let service = &state.session_service;
    let session = service.load_session(&session_id).await?;

    Ok(Json(SessionResponse::build(service, &session)))
}

/// GET /sessions/:session_id/players/:player_id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path((session_id, player_id)): Path<(String, String)>,
) -> Result<Json<PlayerResponse>, AppError> {
    let session = state.session_service.load_session(&session_id).await?;
    player_response(&state, &session, &player_id).await.map(Json)
}

/// POST /sessions/:session_id/players/:player_id/stats
///
/// Configurable stat types go through their setup flow; other types take the
/// input as the record's fields.
#[instrument(name = "add_stats", skip(state, request), fields(stat_type = %request.stat_type))]
pub async fn add_stats(
    State(state): State<AppState>,
    Path((session_id, player_id)): Path<(String, String)>,
    Json(request): Json<AddStatsRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    let service = &state.session_service;
    let mut session = service.load_session(&session_id).await?;

    let configurable = service
        .registry()
        .require(&request.stat_type)?
        .as_configurable()
        .is_some();
    let pending = if configurable {
        service.configure_stats(&mut session, &player_id, &request.stat_type, &request.input)?
    } else {
        let mut record = PlayerStatsData::new(request.stat_type.clone());
        record
            .fields
            .extend(request.input.into_iter().filter(|(name, _)| name != "id"));
        service.add_stats(&mut session, &player_id, record)?
    };

    let refreshed = pending.persist().await?;
    info!(%player_id, "Stats added");

    let response = player_response(&state, &refreshed, &player_id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PATCH /sessions/:session_id/players/:player_id/stats/:key
#[instrument(name = "update_stats", skip(state, patch))]
pub async fn update_stats(
    State(state): State<AppState>,
    Path((session_id, player_id, key)): Path<(String, String, String)>,
    Json(patch): Json<StatPatch>,
) -> Result<Json<PlayerResponse>, AppError> {
    let key = parse_key(&key)?;
    let service = &state.session_service;
    let mut session = service.load_session(&session_id).await?;

    let refreshed = service
        .update_stats(&mut session, &player_id, key, &patch)?
        .persist()
        .await?;

    player_response(&state, &refreshed, &player_id).await.map(Json)
}

/// DELETE /sessions/:session_id/players/:player_id/stats/:key
#[instrument(name = "remove_stats", skip(state))]
pub async fn remove_stats(
    State(state): State<AppState>,
    Path((session_id, player_id, key)): Path<(String, String, String)>,
) -> Result<Json<PlayerResponse>, AppError> {
    let key = parse_key(&key)?;
    let service = &state.session_service;
    let mut session = service.load_session(&session_id).await?;

    let refreshed = service
        .remove_stats(&mut session, &player_id, key)?
        .persist()
        .await?;

    player_response(&state, &refreshed, &player_id).await.map(Json)
}

/// POST /sessions/:session_id/finish
#[instrument(name = "finish_session", skip(state))]
pub async fn finish_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let service = &state.session_service;
    let session = service.finish_session(&session_id).await?;

    Ok(Json(SessionResponse::build(service, &session)))
}

async fn player_response(
    state: &AppState,
    session: &Session,
    player_id: &str,
) -> Result<PlayerResponse, AppError> {
    let player = session
        .player(player_id)
        .ok_or_else(|| {
            AppError::NotFound(format!("player {player_id} in session {}", session.id))
        })?;
    Ok(PlayerResponse::build(&state.session_service, session, player).await)
}

fn parse_key(key: &str) -> Result<RecordKey, AppError> {
    key.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid stats record key: {key}")))
}
