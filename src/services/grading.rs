//! Correctness and TOEIC-style scoring of a submitted answer map.
//!
//! Matching is exact string equality against the stored correct answer; a
//! missing entry and an explicit `None` are both wrong. Each half is scaled
//! independently: `round(correct / max(total, 1) * half_max)`, rounding halves up.

use serde::Serialize;

use crate::core::config::ScoringSettings;
use crate::db::models::ExamContent;
use crate::services::exam_content::{flatten, PartKind};
use crate::services::exam_sessions::AnswerMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct GradedAnswer {
    pub(crate) question_id: String,
    pub(crate) selected_answer: Option<String>,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct PartTally {
    pub(crate) total: u32,
    pub(crate) correct: u32,
}

impl PartTally {
    fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GradeReport {
    pub(crate) answers: Vec<GradedAnswer>,
    pub(crate) total_questions: u32,
    pub(crate) correct_answers: u32,
    pub(crate) listening: PartTally,
    pub(crate) reading: PartTally,
    pub(crate) listening_score: u32,
    pub(crate) reading_score: u32,
    pub(crate) total_score: u32,
}

pub(crate) fn is_correct(selected: Option<&str>, correct_answer: &str) -> bool {
    selected == Some(correct_answer)
}

/// `round(correct / max(total, 1) * max_score)` in integer arithmetic, halves rounded up.
pub(crate) fn scaled_score(correct: u32, total: u32, max_score: u32) -> u32 {
    let total = u64::from(total.max(1));
    let correct = u64::from(correct.min(total as u32));
    let scaled = (2 * correct * u64::from(max_score) + total) / (2 * total);
    scaled as u32
}

pub(crate) fn grade(
    content: &ExamContent,
    submitted: &AnswerMap,
    scale: &ScoringSettings,
) -> GradeReport {
    let flat = flatten(content);

    let mut answers = Vec::with_capacity(flat.len());
    let mut listening = PartTally::default();
    let mut reading = PartTally::default();

    for item in &flat {
        let selected = submitted.get(&item.question.id).cloned().flatten();
        let correct = is_correct(selected.as_deref(), &item.question.correct_answer);

        match item.kind {
            PartKind::Listening => listening.record(correct),
            PartKind::Reading => reading.record(correct),
        }

        answers.push(GradedAnswer {
            question_id: item.question.id.clone(),
            selected_answer: selected,
            is_correct: correct,
        });
    }

    let correct_answers = answers.iter().filter(|answer| answer.is_correct).count() as u32;
    let listening_score = scaled_score(listening.correct, listening.total, scale.listening_max);
    let reading_score = scaled_score(reading.correct, reading.total, scale.reading_max);

    GradeReport {
        total_questions: answers.len() as u32,
        answers,
        correct_answers,
        listening,
        reading,
        listening_score,
        reading_score,
        total_score: listening_score + reading_score,
    }
}
