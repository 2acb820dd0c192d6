use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::ExamContent;
use crate::repositories;

/// Read-only source of full exam content, correct answers included.
#[async_trait]
pub(crate) trait ExamContentRepository: Send + Sync {
    async fn find_full_exam(&self, exam_id: &str) -> anyhow::Result<Option<ExamContent>>;
}

#[derive(Clone)]
pub(crate) struct PgExamContentRepository {
    pool: PgPool,
}

impl PgExamContentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamContentRepository for PgExamContentRepository {
    async fn find_full_exam(&self, exam_id: &str) -> anyhow::Result<Option<ExamContent>> {
        repositories::exams::fetch_content(&self.pool, exam_id)
            .await
            .with_context(|| format!("failed to load content for exam {exam_id}"))
    }
}
