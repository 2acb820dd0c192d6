use serde::{Deserialize, Serialize};
use validator::Validate;

pub(crate) const fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PageQuery {
    #[serde(default)]
    #[validate(range(min = 0, message = "skip must be non-negative"))]
    pub(crate) skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub(crate) limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}
