//! Player-facing view of an exam: correct answers, transcripts and explanations removed,
//! each question carrying its display number.

use serde::Serialize;

use crate::core::time::format_offset;
use crate::db::models::{ExamContent, GroupContent, Question, QuestionOption, SectionContent};
use crate::services::exam_content::PartKind;
use crate::services::question_numbering::{
    question_number, question_number_in_layout, Part7Layout,
};

#[derive(Debug, Serialize)]
pub(crate) struct QuestionTakeResponse {
    pub(crate) id: String,
    pub(crate) number: u32,
    pub(crate) group_id: Option<String>,
    pub(crate) question_text: Option<String>,
    pub(crate) options: Vec<QuestionOption>,
    pub(crate) order_index: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupTakeResponse {
    pub(crate) id: String,
    pub(crate) paragraph: Option<String>,
    pub(crate) order_index: i32,
    pub(crate) questions: Vec<QuestionTakeResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SectionTakeResponse {
    pub(crate) id: String,
    pub(crate) part: i32,
    pub(crate) kind: PartKind,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) order_index: i32,
    pub(crate) questions: Vec<QuestionTakeResponse>,
    pub(crate) groups: Vec<GroupTakeResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamTakeResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) audio_url: Option<String>,
    pub(crate) duration: i32,
    pub(crate) total_score: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) sections: Vec<SectionTakeResponse>,
}

impl ExamTakeResponse {
    pub(crate) fn from_content(content: &ExamContent) -> Self {
        let exam = &content.exam;
        Self {
            id: exam.id.clone(),
            title: exam.title.clone(),
            description: exam.description.clone(),
            audio_url: exam.audio_url.clone(),
            duration: exam.duration,
            total_score: exam.total_score,
            created_at: format_offset(exam.created_at),
            updated_at: format_offset(exam.updated_at),
            sections: content.sections.iter().map(section_view).collect(),
        }
    }
}

fn section_view(content: &SectionContent) -> SectionTakeResponse {
    let section = &content.section;
    let part = section.part;
    let part7 = (part == 7).then(|| {
        let sizes: Vec<u32> =
            content.groups.iter().map(|group| group.questions.len() as u32).collect();
        Part7Layout::from_group_sizes(&sizes)
    });
    let number = |group_order: u32, position: u32| match &part7 {
        Some(layout) => question_number_in_layout(part, group_order, position, layout),
        None => question_number(part, group_order, position),
    };

    let questions = content
        .questions
        .iter()
        .filter(|question| question.group_id.is_none())
        .enumerate()
        .map(|(index, question)| question_view(question, number(0, index as u32 + 1)))
        .collect();

    let groups = content
        .groups
        .iter()
        .enumerate()
        .map(|(index, group)| group_view(group, |position| number(index as u32 + 1, position)))
        .collect();

    SectionTakeResponse {
        id: section.id.clone(),
        part,
        kind: PartKind::for_part(part),
        name: section.name.clone(),
        description: section.description.clone(),
        order_index: section.order_index,
        questions,
        groups,
    }
}

fn group_view(content: &GroupContent, number: impl Fn(u32) -> u32) -> GroupTakeResponse {
    GroupTakeResponse {
        id: content.group.id.clone(),
        paragraph: content.group.paragraph.clone(),
        order_index: content.group.order_index,
        questions: content
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| question_view(question, number(index as u32 + 1)))
            .collect(),
    }
}

fn question_view(question: &Question, number: u32) -> QuestionTakeResponse {
    QuestionTakeResponse {
        id: question.id.clone(),
        number,
        group_id: question.group_id.clone(),
        question_text: question.question_text.clone(),
        options: question.options.0.clone(),
        order_index: question.order_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    fn questions(prefix: &str, count: usize) -> Vec<Question> {
        (1..=count).map(|index| fixtures::question(&format!("{prefix}{index}"), "A")).collect()
    }

    #[test]
    fn numbers_follow_part_layout() {
        let content = fixtures::exam(
            "e1",
            vec![
                fixtures::section("s2", 2, questions("p2-", 3), vec![]),
                fixtures::section(
                    "s3",
                    3,
                    vec![],
                    vec![
                        fixtures::group("g1", questions("g1-", 3)),
                        fixtures::group("g2", questions("g2-", 3)),
                    ],
                ),
            ],
        );

        let view = ExamTakeResponse::from_content(&content);

        let part2: Vec<u32> = view.sections[0].questions.iter().map(|q| q.number).collect();
        assert_eq!(part2, vec![7, 8, 9]);
        let second_group: Vec<u32> =
            view.sections[1].groups[1].questions.iter().map(|q| q.number).collect();
        assert_eq!(second_group, vec![35, 36, 37]);
        assert_eq!(view.sections[1].kind, PartKind::Listening);
    }

    #[test]
    fn part7_numbers_use_stored_group_sizes() {
        let groups = (1..=5)
            .map(|index| fixtures::group(&format!("g{index}"), questions(&format!("g{index}-"), 5)))
            .collect();
        let content = fixtures::exam("e1", vec![fixtures::section("s7", 7, vec![], groups)]);

        let view = ExamTakeResponse::from_content(&content);

        let last = &view.sections[0].groups[4].questions;
        assert_eq!(last[0].number, 167);
        assert_eq!(last[4].number, 171);
    }

    #[test]
    fn answers_are_not_serialized() {
        let mut question = fixtures::question("q1", "C");
        question.transcript = Some("secret transcript".to_string());
        question.explanation = Some("because C".to_string());
        let content =
            fixtures::exam("e1", vec![fixtures::section("s1", 1, vec![question], vec![])]);

        let body = serde_json::to_string(&ExamTakeResponse::from_content(&content))
            .expect("serialize");

        assert!(!body.contains("correct_answer"));
        assert!(!body.contains("secret transcript"));
        assert!(!body.contains("because C"));
        assert!(body.contains("\"number\":1"));
    }
}
