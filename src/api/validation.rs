use crate::api::errors::ApiError;
use crate::services::exam_sessions::is_key_segment;

/// Both ids become segments of the session key.
pub(crate) fn validate_session_ids(user_id: &str, exam_id: &str) -> Result<(), ApiError> {
    if is_key_segment(user_id) && is_key_segment(exam_id) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Identifiers must not contain ':'".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_session_ids;

    #[test]
    fn rejects_separator_in_either_id() {
        assert!(validate_session_ids("u1", "e1").is_ok());
        assert!(validate_session_ids("u1:x", "e1").is_err());
        assert!(validate_session_ids("u1", "x:e1").is_err());
    }
}
