use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::{ExamAnswerRow, ExamResultRow};
use crate::repositories;
use crate::repositories::exam_results::{CreateExamAnswer, CreateExamResult};
use crate::services::grading::GradedAnswer;

/// A graded attempt ready to be stored.
#[derive(Debug, Clone)]
pub(crate) struct NewExamResult {
    pub(crate) user_id: String,
    pub(crate) exam_id: String,
    pub(crate) score: u32,
    pub(crate) listening_score: u32,
    pub(crate) reading_score: u32,
    pub(crate) total_questions: u32,
    pub(crate) correct_answers: u32,
    pub(crate) time_spent: u32,
    pub(crate) started_at: OffsetDateTime,
    pub(crate) completed_at: OffsetDateTime,
    pub(crate) answers: Vec<GradedAnswer>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StoredAnswer {
    pub(crate) question_id: String,
    pub(crate) selected_answer: Option<String>,
    pub(crate) is_correct: bool,
}

impl From<ExamAnswerRow> for StoredAnswer {
    fn from(row: ExamAnswerRow) -> Self {
        Self {
            question_id: row.question_id,
            selected_answer: row.selected_answer,
            is_correct: row.is_correct,
        }
    }
}

/// A persisted result. Immutable once created.
#[derive(Debug, Clone)]
pub(crate) struct ExamResult {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) exam_id: String,
    pub(crate) score: i32,
    pub(crate) listening_score: i32,
    pub(crate) reading_score: i32,
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) time_spent: i32,
    pub(crate) started_at: OffsetDateTime,
    pub(crate) completed_at: OffsetDateTime,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) answers: Vec<StoredAnswer>,
}

impl ExamResult {
    pub(crate) fn from_rows(row: ExamResultRow, answers: Vec<ExamAnswerRow>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            exam_id: row.exam_id,
            score: row.score,
            listening_score: row.listening_score,
            reading_score: row.reading_score,
            total_questions: row.total_questions,
            correct_answers: row.correct_answers,
            time_spent: row.time_spent,
            started_at: row.started_at,
            completed_at: row.completed_at,
            created_at: row.created_at,
            answers: answers.into_iter().map(StoredAnswer::from).collect(),
        }
    }
}

#[async_trait]
pub(crate) trait ExamResultRepository: Send + Sync {
    async fn create(&self, result: NewExamResult) -> anyhow::Result<ExamResult>;

    /// Newest first, without answers.
    async fn list_for_user(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<ExamResult>>;

    async fn count_for_user(&self, user_id: &str) -> anyhow::Result<i64>;

    /// `None` when the result does not exist or belongs to someone else.
    async fn find_for_user(
        &self,
        result_id: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<ExamResult>>;
}

fn db_int(value: u32, field: &str) -> anyhow::Result<i32> {
    i32::try_from(value).with_context(|| format!("{field} is out of range: {value}"))
}

#[derive(Clone)]
pub(crate) struct PgExamResultRepository {
    pool: PgPool,
}

impl PgExamResultRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamResultRepository for PgExamResultRepository {
    async fn create(&self, result: NewExamResult) -> anyhow::Result<ExamResult> {
        let answers: Vec<CreateExamAnswer<'_>> = result
            .answers
            .iter()
            .map(|answer| CreateExamAnswer {
                question_id: &answer.question_id,
                selected_answer: answer.selected_answer.as_deref(),
                is_correct: answer.is_correct,
            })
            .collect();

        let (row, answer_rows) = repositories::exam_results::create(
            &self.pool,
            CreateExamResult {
                user_id: &result.user_id,
                exam_id: &result.exam_id,
                score: db_int(result.score, "score")?,
                listening_score: db_int(result.listening_score, "listening_score")?,
                reading_score: db_int(result.reading_score, "reading_score")?,
                total_questions: db_int(result.total_questions, "total_questions")?,
                correct_answers: db_int(result.correct_answers, "correct_answers")?,
                time_spent: db_int(result.time_spent, "time_spent")?,
                started_at: result.started_at,
                completed_at: result.completed_at,
            },
            &answers,
        )
        .await
        .context("failed to store exam result")?;

        Ok(ExamResult::from_rows(row, answer_rows))
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<ExamResult>> {
        let rows = repositories::exam_results::list_by_user(&self.pool, user_id, skip, limit)
            .await
            .context("failed to list exam results")?;
        Ok(rows.into_iter().map(|row| ExamResult::from_rows(row, Vec::new())).collect())
    }

    async fn count_for_user(&self, user_id: &str) -> anyhow::Result<i64> {
        repositories::exam_results::count_by_user(&self.pool, user_id)
            .await
            .context("failed to count exam results")
    }

    async fn find_for_user(
        &self,
        result_id: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<ExamResult>> {
        let Some(row) = repositories::exam_results::find_for_user(&self.pool, result_id, user_id)
            .await
            .context("failed to load exam result")?
        else {
            return Ok(None);
        };

        let answers = repositories::exam_results::list_answers(&self.pool, &row.id)
            .await
            .context("failed to load exam answers")?;
        Ok(Some(ExamResult::from_rows(row, answers)))
    }
}
