use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::core::state::AppState;
use crate::schemas::result::{ExamResultResponse, ExamResultSummary};

pub(super) async fn list_my_results(
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<ExamResultSummary>>, ApiError> {
    page.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let results = state
        .results()
        .list_for_user(&user_id, page.skip, page.limit)
        .await
        .map_err(|e| ApiError::internal(format!("{e:#}"), "Failed to list results"))?;
    let total_count = state
        .results()
        .count_for_user(&user_id)
        .await
        .map_err(|e| ApiError::internal(format!("{e:#}"), "Failed to count results"))?;

    Ok(Json(PaginatedResponse {
        items: results.iter().map(ExamResultSummary::from).collect(),
        total_count,
        skip: page.skip,
        limit: page.limit,
    }))
}

pub(super) async fn get_result(
    Path(result_id): Path<String>,
    CurrentUser { user_id }: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ExamResultResponse>, ApiError> {
    let result = state
        .results()
        .find_for_user(&result_id, &user_id)
        .await
        .map_err(|e| ApiError::internal(format!("{e:#}"), "Failed to load result"))?
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    Ok(Json(ExamResultResponse::from(result)))
}
