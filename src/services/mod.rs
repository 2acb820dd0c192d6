pub(crate) mod exam_catalog;
pub(crate) mod exam_content;
pub(crate) mod exam_results;
pub(crate) mod exam_sessions;
pub(crate) mod exam_submission;
pub(crate) mod grading;
pub(crate) mod question_numbering;
