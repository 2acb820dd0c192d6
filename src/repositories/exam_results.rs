use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{ExamAnswerRow, ExamResultRow};

pub(crate) const COLUMNS: &str = "\
    id, user_id, exam_id, score, listening_score, reading_score, total_questions, \
    correct_answers, time_spent, started_at, completed_at, created_at";

const ANSWER_COLUMNS: &str = "question_id, selected_answer, is_correct";

pub(crate) struct CreateExamResult<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) score: i32,
    pub(crate) listening_score: i32,
    pub(crate) reading_score: i32,
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) time_spent: i32,
    pub(crate) started_at: OffsetDateTime,
    pub(crate) completed_at: OffsetDateTime,
}

pub(crate) struct CreateExamAnswer<'a> {
    pub(crate) question_id: &'a str,
    pub(crate) selected_answer: Option<&'a str>,
    pub(crate) is_correct: bool,
}

/// Inserts the result and its answers in one transaction.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateExamResult<'_>,
    answers: &[CreateExamAnswer<'_>],
) -> Result<(ExamResultRow, Vec<ExamAnswerRow>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query_as::<_, ExamResultRow>(&format!(
        "INSERT INTO exam_results (
            id, user_id, exam_id, score, listening_score, reading_score,
            total_questions, correct_answers, time_spent, started_at, completed_at, created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.user_id)
    .bind(params.exam_id)
    .bind(params.score)
    .bind(params.listening_score)
    .bind(params.reading_score)
    .bind(params.total_questions)
    .bind(params.correct_answers)
    .bind(params.time_spent)
    .bind(params.started_at)
    .bind(params.completed_at)
    .bind(params.completed_at)
    .fetch_one(&mut *tx)
    .await?;

    let mut rows = Vec::with_capacity(answers.len());
    for answer in answers {
        let row = sqlx::query_as::<_, ExamAnswerRow>(&format!(
            "INSERT INTO exam_answers (id, exam_result_id, question_id, selected_answer, is_correct)
             VALUES ($1,$2,$3,$4,$5)
             RETURNING {ANSWER_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&result.id)
        .bind(answer.question_id)
        .bind(answer.selected_answer)
        .bind(answer.is_correct)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok((result, rows))
}

pub(crate) async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<ExamResultRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamResultRow>(&format!(
        "SELECT {COLUMNS} FROM exam_results
         WHERE user_id = $1
         ORDER BY completed_at DESC, id
         OFFSET $2 LIMIT $3"
    ))
    .bind(user_id)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_by_user(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exam_results WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_for_user(
    pool: &PgPool,
    result_id: &str,
    user_id: &str,
) -> Result<Option<ExamResultRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamResultRow>(&format!(
        "SELECT {COLUMNS} FROM exam_results WHERE id = $1 AND user_id = $2"
    ))
    .bind(result_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_answers(
    pool: &PgPool,
    result_id: &str,
) -> Result<Vec<ExamAnswerRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamAnswerRow>(
        "SELECT a.question_id, a.selected_answer, a.is_correct
         FROM exam_answers a
         JOIN questions q ON q.id = a.question_id
         JOIN sections s ON s.id = q.section_id
         WHERE a.exam_result_id = $1
         ORDER BY s.order_index, q.order_index, a.id",
    )
    .bind(result_id)
    .fetch_all(pool)
    .await
}
