use serde::Serialize;

use crate::db::models::{ExamContent, Question, SectionContent};

/// Highest part number that belongs to the listening half.
pub(crate) const LAST_LISTENING_PART: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PartKind {
    Listening,
    Reading,
}

impl PartKind {
    pub(crate) fn for_part(part: i32) -> Self {
        if part <= LAST_LISTENING_PART {
            Self::Listening
        } else {
            Self::Reading
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FlatQuestion<'a> {
    pub(crate) question: &'a Question,
    pub(crate) kind: PartKind,
}

/// Questions of one section: ungrouped ones first, then each group's in order.
pub(crate) fn section_questions(section: &SectionContent) -> impl Iterator<Item = &Question> {
    section
        .questions
        .iter()
        .filter(|question| question.group_id.is_none())
        .chain(section.groups.iter().flat_map(|group| group.questions.iter()))
}

/// Every question of the exam in aggregation order, tagged with its section's half.
pub(crate) fn flatten(content: &ExamContent) -> Vec<FlatQuestion<'_>> {
    content
        .sections
        .iter()
        .flat_map(|section| {
            let kind = PartKind::for_part(section.section.part);
            section_questions(section).map(move |question| FlatQuestion { question, kind })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    #[test]
    fn parts_one_to_four_are_listening() {
        for part in 1..=4 {
            assert_eq!(PartKind::for_part(part), PartKind::Listening);
        }
        for part in 5..=7 {
            assert_eq!(PartKind::for_part(part), PartKind::Reading);
        }
    }

    #[test]
    fn standalone_questions_precede_group_questions() {
        let content = fixtures::exam(
            "e1",
            vec![
                fixtures::section(
                    "s1",
                    1,
                    vec![fixtures::question("q1", "A"), fixtures::question("q2", "B")],
                    vec![],
                ),
                fixtures::section(
                    "s3",
                    3,
                    vec![fixtures::question("q3", "C")],
                    vec![
                        fixtures::group("g1", vec![fixtures::question("q4", "A")]),
                        fixtures::group(
                            "g2",
                            vec![fixtures::question("q5", "B"), fixtures::question("q6", "C")],
                        ),
                    ],
                ),
                fixtures::section(
                    "s7",
                    7,
                    vec![],
                    vec![fixtures::group("g3", vec![fixtures::question("q7", "D")])],
                ),
            ],
        );

        let flat = flatten(&content);
        let ids: Vec<&str> = flat.iter().map(|item| item.question.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3", "q4", "q5", "q6", "q7"]);
        assert_eq!(flat[3].kind, PartKind::Listening);
        assert_eq!(flat[6].kind, PartKind::Reading);
    }

    #[test]
    fn grouped_question_in_section_list_is_not_counted_twice() {
        let mut stray = fixtures::question("q2", "B");
        stray.group_id = Some("g1".to_string());
        let content = fixtures::exam(
            "e1",
            vec![fixtures::section(
                "s6",
                6,
                vec![fixtures::question("q1", "A"), stray],
                vec![fixtures::group("g1", vec![fixtures::question("q2", "B")])],
            )],
        );

        let ids: Vec<String> =
            flatten(&content).iter().map(|item| item.question.id.clone()).collect();
        assert_eq!(ids, vec!["q1".to_string(), "q2".to_string()]);
    }

    #[test]
    fn empty_exam_flattens_to_nothing() {
        assert!(flatten(&fixtures::exam("e1", vec![])).is_empty());
    }
}
