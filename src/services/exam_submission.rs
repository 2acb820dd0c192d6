//! Final submission: closes the live session, grades the answers and stores the result.

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::time::{elapsed_seconds, now_utc};
use crate::core::{metrics, state::AppState};
use crate::services::exam_results::{ExamResult, NewExamResult};
use crate::services::exam_sessions::{AnswerMap, SessionError};
use crate::services::grading;

#[derive(Debug, Error)]
pub(crate) enum SubmitError {
    #[error("exam {0} not found")]
    ExamNotFound(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("repository failure: {0}")]
    Repository(anyhow::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct SubmitExam {
    pub(crate) user_id: String,
    pub(crate) exam_id: String,
    pub(crate) answers: AnswerMap,
    pub(crate) time_spent: u32,
    pub(crate) started_at: OffsetDateTime,
}

/// Grades the submitted answers, which are authoritative over whatever the session held.
///
/// The session is deleted before anything else, so a failed lookup or store
/// still leaves the attempt closed.
pub(crate) async fn submit_exam(
    state: &AppState,
    command: SubmitExam,
) -> Result<ExamResult, SubmitError> {
    state.sessions().delete(&command.user_id, &command.exam_id).await?;

    let content = state
        .exams()
        .find_full_exam(&command.exam_id)
        .await
        .map_err(SubmitError::Repository)?
        .ok_or_else(|| SubmitError::ExamNotFound(command.exam_id.clone()))?;

    let report = grading::grade(&content, &command.answers, state.settings().scoring());
    let completed_at = now_utc();

    let stored = state
        .results()
        .create(NewExamResult {
            user_id: command.user_id,
            exam_id: command.exam_id,
            score: report.total_score,
            listening_score: report.listening_score,
            reading_score: report.reading_score,
            total_questions: report.total_questions,
            correct_answers: report.correct_answers,
            time_spent: command.time_spent,
            started_at: command.started_at,
            completed_at,
            answers: report.answers,
        })
        .await
        .map_err(SubmitError::Repository)?;

    metrics::record_submission(report.total_score);
    tracing::info!(
        result_id = %stored.id,
        user_id = %stored.user_id,
        exam_id = %stored.exam_id,
        correct_answers = report.correct_answers,
        total_questions = report.total_questions,
        listening_correct = report.listening.correct,
        listening_total = report.listening.total,
        reading_correct = report.reading.correct,
        reading_total = report.reading.total,
        listening_score = report.listening_score,
        reading_score = report.reading_score,
        total_score = report.total_score,
        time_spent = stored.time_spent,
        wall_clock_seconds = elapsed_seconds(stored.started_at, completed_at),
        "Exam submitted and graded"
    );

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exam_sessions::ExamSession;
    use crate::test_support::{self, fixtures};

    fn command(answers: &[(&str, &str)]) -> SubmitExam {
        SubmitExam {
            user_id: "u1".to_string(),
            exam_id: "e1".to_string(),
            answers: answers
                .iter()
                .map(|(id, value)| (id.to_string(), Some(value.to_string())))
                .collect(),
            time_spent: 120,
            started_at: now_utc(),
        }
    }

    #[tokio::test]
    async fn submit_grades_stores_and_closes_session() {
        let ctx = test_support::setup_test_context().await;
        ctx.exams.insert(fixtures::exam(
            "e1",
            vec![fixtures::section("s1", 1, vec![fixtures::question("q1", "A")], vec![])],
        ));
        ctx.state
            .sessions()
            .create(&ExamSession::start("u1", "e1", 3600, now_utc()))
            .await
            .expect("create session");

        let result = submit_exam(&ctx.state, command(&[("q1", "A")])).await.expect("submit");

        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.total_questions, 1);
        assert_eq!(result.listening_score, 495);
        assert_eq!(result.reading_score, 0);
        assert_eq!(result.score, 495);
        assert_eq!(result.time_spent, 120);
        assert_eq!(result.answers.len(), 1);
        assert!(ctx.state.sessions().get("u1", "e1").await.is_none());
        assert_eq!(ctx.results.len(), 1);
    }

    #[tokio::test]
    async fn missing_exam_still_closes_session() {
        let ctx = test_support::setup_test_context().await;
        ctx.state
            .sessions()
            .create(&ExamSession::start("u1", "e1", 3600, now_utc()))
            .await
            .expect("create session");

        let err = submit_exam(&ctx.state, command(&[])).await.unwrap_err();

        assert!(matches!(err, SubmitError::ExamNotFound(ref id) if id == "e1"));
        assert!(ctx.state.sessions().get("u1", "e1").await.is_none());
        assert_eq!(ctx.results.len(), 0);
    }

    #[tokio::test]
    async fn submit_without_session_is_allowed() {
        let ctx = test_support::setup_test_context().await;
        ctx.exams.insert(fixtures::exam(
            "e1",
            vec![fixtures::section("s1", 1, vec![fixtures::question("q1", "A")], vec![])],
        ));

        let result = submit_exam(&ctx.state, command(&[])).await.expect("submit");

        assert_eq!(result.correct_answers, 0);
        assert_eq!(result.listening_score, 0);
        assert_eq!(result.answers[0].selected_answer, None);
    }
}
