mod session;
mod submit;
mod take;

use axum::{routing::get, routing::patch, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:exam_id/session",
            get(session::get_session).post(session::create_session).delete(session::delete_session),
        )
        .route("/:exam_id/session/answer", patch(session::update_answer))
        .route("/:exam_id/session/time", patch(session::update_time))
        .route("/:exam_id/session/extend", post(session::extend_session))
        .route("/:exam_id/submit", post(submit::submit_exam))
        .route("/:exam_id/take", get(take::take_exam))
}
