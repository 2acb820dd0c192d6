use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::exam::ExamTakeResponse;

pub(super) async fn take_exam(
    Path(exam_id): Path<String>,
    _user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ExamTakeResponse>, ApiError> {
    let content = state
        .exams()
        .find_full_exam(&exam_id)
        .await
        .map_err(|e| ApiError::internal(format!("{e:#}"), "Failed to load exam"))?
        .filter(|content| content.exam.is_active)
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    Ok(Json(ExamTakeResponse::from_content(&content)))
}
