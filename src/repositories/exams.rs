use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::models::{
    Exam, ExamContent, GroupContent, Question, QuestionGroup, Section, SectionContent,
};

pub(crate) const COLUMNS: &str = "\
    id, title, description, audio_url, duration, total_score, is_active, created_at, updated_at";

const SECTION_COLUMNS: &str = "id, exam_id, part, name, description, order_index";

const GROUP_COLUMNS: &str = "g.id, g.section_id, g.paragraph, g.order_index";

const QUESTION_COLUMNS: &str = "\
    q.id, q.section_id, q.group_id, q.question_text, q.options, q.correct_answer, \
    q.transcript, q.explanation, q.order_index";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_sections(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(&format!(
        "SELECT {SECTION_COLUMNS} FROM sections WHERE exam_id = $1 ORDER BY order_index, id"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_groups(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<QuestionGroup>, sqlx::Error> {
    sqlx::query_as::<_, QuestionGroup>(&format!(
        "SELECT {GROUP_COLUMNS} FROM question_groups g \
         JOIN sections s ON s.id = g.section_id \
         WHERE s.exam_id = $1 \
         ORDER BY g.order_index, g.id"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_questions(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions q \
         JOIN sections s ON s.id = q.section_id \
         WHERE s.exam_id = $1 \
         ORDER BY q.order_index, q.id"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

/// Loads the exam with every section, group and question, each level in `order_index` order.
pub(crate) async fn fetch_content(
    pool: &PgPool,
    exam_id: &str,
) -> Result<Option<ExamContent>, sqlx::Error> {
    let Some(exam) = find_by_id(pool, exam_id).await? else {
        return Ok(None);
    };

    let sections = list_sections(pool, exam_id).await?;
    let groups = list_groups(pool, exam_id).await?;
    let questions = list_questions(pool, exam_id).await?;

    Ok(Some(assemble(exam, sections, groups, questions)))
}

/// Nests flat rows into the content tree. Input order is preserved at each level.
pub(crate) fn assemble(
    exam: Exam,
    sections: Vec<Section>,
    groups: Vec<QuestionGroup>,
    questions: Vec<Question>,
) -> ExamContent {
    let mut by_group: HashMap<String, Vec<Question>> = HashMap::new();
    let mut by_section: HashMap<String, Vec<Question>> = HashMap::new();
    for question in questions {
        match &question.group_id {
            Some(group_id) => by_group.entry(group_id.clone()).or_default().push(question),
            None => by_section.entry(question.section_id.clone()).or_default().push(question),
        }
    }

    let mut groups_by_section: HashMap<String, Vec<GroupContent>> = HashMap::new();
    for group in groups {
        let questions = by_group.remove(&group.id).unwrap_or_default();
        groups_by_section
            .entry(group.section_id.clone())
            .or_default()
            .push(GroupContent { group, questions });
    }

    let sections = sections
        .into_iter()
        .map(|section| SectionContent {
            questions: by_section.remove(&section.id).unwrap_or_default(),
            groups: groups_by_section.remove(&section.id).unwrap_or_default(),
            section,
        })
        .collect();

    ExamContent { exam, sections }
}
