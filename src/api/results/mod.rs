mod handlers;

use axum::{routing::get, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/my", get(handlers::list_my_results))
        .route("/:result_id", get(handlers::get_result))
}
