use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) audio_url: Option<String>,
    /// Minutes.
    pub(crate) duration: i32,
    pub(crate) total_score: i32,
    pub(crate) is_active: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Section {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    /// TOEIC part number, 1..=7.
    pub(crate) part: i32,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuestionGroup {
    pub(crate) id: String,
    pub(crate) section_id: String,
    pub(crate) paragraph: Option<String>,
    pub(crate) order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct QuestionOption {
    pub(crate) text: String,
    pub(crate) value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) section_id: String,
    pub(crate) group_id: Option<String>,
    pub(crate) question_text: Option<String>,
    pub(crate) options: Json<Vec<QuestionOption>>,
    pub(crate) correct_answer: String,
    pub(crate) transcript: Option<String>,
    pub(crate) explanation: Option<String>,
    pub(crate) order_index: i32,
}

/// A group and its questions in stored order.
#[derive(Debug, Clone)]
pub(crate) struct GroupContent {
    pub(crate) group: QuestionGroup,
    pub(crate) questions: Vec<Question>,
}

/// A section with its ungrouped questions and its groups, both in stored order.
#[derive(Debug, Clone)]
pub(crate) struct SectionContent {
    pub(crate) section: Section,
    pub(crate) questions: Vec<Question>,
    pub(crate) groups: Vec<GroupContent>,
}

/// Full exam tree including correct answers. Never sent to exam takers as is.
#[derive(Debug, Clone)]
pub(crate) struct ExamContent {
    pub(crate) exam: Exam,
    pub(crate) sections: Vec<SectionContent>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ExamResultRow {
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
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ExamAnswerRow {
    pub(crate) question_id: String,
    pub(crate) selected_answer: Option<String>,
    pub(crate) is_correct: bool,
}
