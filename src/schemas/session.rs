use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::exam_sessions::ExamSession;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionRequest {
    #[serde(alias = "timeRemaining")]
    pub(crate) time_remaining: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdateAnswerRequest {
    #[serde(alias = "questionId")]
    #[validate(length(min = 1, message = "question_id must not be empty"))]
    pub(crate) question_id: String,
    /// `null` clears the answer.
    #[serde(default)]
    pub(crate) answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateTimeRequest {
    #[serde(alias = "timeRemaining")]
    pub(crate) time_remaining: u32,
}

/// `session` is `null` when there is no live attempt.
#[derive(Debug, Serialize)]
pub(crate) struct SessionEnvelope {
    pub(crate) session: Option<ExamSession>,
    /// Seconds before the session lapses without further writes.
    pub(crate) expires_in: Option<u64>,
}
