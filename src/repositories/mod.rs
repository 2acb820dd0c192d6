pub(crate) mod exam_results;
pub(crate) mod exams;
pub(crate) mod health;
