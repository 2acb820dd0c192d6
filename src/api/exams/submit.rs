use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_session_ids;
use crate::core::{state::AppState, time::now_utc};
use crate::schemas::result::{ExamResultResponse, SubmitExamRequest};
use crate::services::exam_submission::{self, SubmitExam};

pub(super) async fn submit_exam(
    Path(exam_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<(StatusCode, Json<ExamResultResponse>), ApiError> {
    validate_session_ids(&user_id, &exam_id)?;

    let started_at = match payload.started_at {
        Some(started_at) => started_at,
        None => state
            .sessions()
            .get(&user_id, &exam_id)
            .await
            .map(|session| session.started_at)
            .unwrap_or_else(now_utc),
    };

    let result = exam_submission::submit_exam(
        &state,
        SubmitExam {
            user_id,
            exam_id,
            answers: payload.answers,
            time_spent: payload.time_spent,
            started_at,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ExamResultResponse::from(result))))
}
