use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::time::format_offset;
use crate::services::exam_results::{ExamResult, StoredAnswer};
use crate::services::exam_sessions::AnswerMap;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitExamRequest {
    #[serde(default)]
    pub(crate) answers: AnswerMap,
    #[serde(alias = "timeSpent")]
    pub(crate) time_spent: u32,
    /// Falls back to the live session's start, then to the submission time.
    #[serde(default, alias = "startedAt", with = "time::serde::rfc3339::option")]
    pub(crate) started_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResultSummary {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) exam_id: String,
    pub(crate) score: i32,
    pub(crate) listening_score: i32,
    pub(crate) reading_score: i32,
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) time_spent: i32,
    pub(crate) started_at: String,
    pub(crate) completed_at: String,
    pub(crate) created_at: String,
}

impl From<&ExamResult> for ExamResultSummary {
    fn from(result: &ExamResult) -> Self {
        Self {
            id: result.id.clone(),
            user_id: result.user_id.clone(),
            exam_id: result.exam_id.clone(),
            score: result.score,
            listening_score: result.listening_score,
            reading_score: result.reading_score,
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            time_spent: result.time_spent,
            started_at: format_offset(result.started_at),
            completed_at: format_offset(result.completed_at),
            created_at: format_offset(result.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResultResponse {
    #[serde(flatten)]
    pub(crate) summary: ExamResultSummary,
    pub(crate) answers: Vec<StoredAnswer>,
}

impl From<ExamResult> for ExamResultResponse {
    fn from(result: ExamResult) -> Self {
        let summary = ExamResultSummary::from(&result);
        Self { summary, answers: result.answers }
    }
}
