use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_session_ids;
use crate::core::{state::AppState, time::now_utc};
use crate::schemas::session::{
    CreateSessionRequest, SessionEnvelope, UpdateAnswerRequest, UpdateTimeRequest,
};
use crate::schemas::MessageResponse;
use crate::services::exam_sessions::ExamSession;

pub(super) async fn get_session(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<SessionEnvelope>, ApiError> {
    validate_session_ids(&user_id, &exam_id)?;

    let Some(session) = state.sessions().get(&user_id, &exam_id).await else {
        return Ok(Json(SessionEnvelope { session: None, expires_in: None }));
    };
    let expires_in = state.sessions().expires_in(&user_id, &exam_id).await;

    Ok(Json(SessionEnvelope { session: Some(session), expires_in }))
}

pub(super) async fn create_session(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionEnvelope>), ApiError> {
    validate_session_ids(&user_id, &exam_id)?;

    let session = ExamSession::start(&user_id, &exam_id, payload.time_remaining, now_utc());
    session.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.sessions().create(&session).await?;
    let expires_in = Some(state.sessions().ttl_seconds());

    Ok((StatusCode::CREATED, Json(SessionEnvelope { session: Some(session), expires_in })))
}

pub(super) async fn update_answer(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateAnswerRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_session_ids(&user_id, &exam_id)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .sessions()
        .update_answer(&user_id, &exam_id, &payload.question_id, payload.answer)
        .await?;

    Ok(Json(MessageResponse::new("Answer updated")))
}

pub(super) async fn update_time(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTimeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_session_ids(&user_id, &exam_id)?;

    state.sessions().update_time_remaining(&user_id, &exam_id, payload.time_remaining).await?;

    Ok(Json(MessageResponse::new("Time remaining updated")))
}

pub(super) async fn extend_session(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_session_ids(&user_id, &exam_id)?;

    state.sessions().extend(&user_id, &exam_id).await?;

    Ok(Json(MessageResponse::new("Session extended")))
}

pub(super) async fn delete_session(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_session_ids(&user_id, &exam_id)?;

    state.sessions().delete(&user_id, &exam_id).await?;

    Ok(Json(MessageResponse::new("Session deleted")))
}
