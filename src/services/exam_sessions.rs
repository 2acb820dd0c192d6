//! Lifecycle of in-progress exam attempts.
//!
//! One live session exists per (user, exam) pair. It is stored as a single
//! JSON value under `exam:session:{user}:{exam}` and every write re-applies the
//! full TTL, so any client activity keeps the attempt alive and total
//! inactivity for the TTL window discards it. Concurrent writers to the same
//! key are last-write-wins.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

use crate::core::metrics;
use crate::core::session_store::{KeyValueStore, StoreError};

pub(crate) const SESSION_KEY_PREFIX: &str = "exam:session:";
const KEY_SEPARATOR: char = ':';

/// Question id -> submitted option value, `None` for an explicit "no answer".
pub(crate) type AnswerMap = HashMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub(crate) struct ExamSession {
    #[validate(
        length(min = 1, message = "exam_id must not be empty"),
        custom(function = "validate_key_segment")
    )]
    pub(crate) exam_id: String,
    #[validate(
        length(min = 1, message = "user_id must not be empty"),
        custom(function = "validate_key_segment")
    )]
    pub(crate) user_id: String,
    #[serde(rename = "startedAt", alias = "started_at", with = "time::serde::rfc3339")]
    pub(crate) started_at: OffsetDateTime,
    /// Seconds, as last reported by the client.
    #[serde(rename = "timeRemaining", alias = "time_remaining")]
    pub(crate) time_remaining: u32,
    pub(crate) answers: AnswerMap,
}

impl ExamSession {
    pub(crate) fn start(
        user_id: &str,
        exam_id: &str,
        time_remaining: u32,
        started_at: OffsetDateTime,
    ) -> Self {
        Self {
            exam_id: exam_id.to_string(),
            user_id: user_id.to_string(),
            started_at,
            time_remaining,
            answers: AnswerMap::new(),
        }
    }
}

/// Fields replaced by [`ExamSessionService::update`]; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionPatch {
    pub(crate) started_at: Option<OffsetDateTime>,
    pub(crate) time_remaining: Option<u32>,
    pub(crate) answers: Option<AnswerMap>,
}

impl SessionPatch {
    fn apply(self, session: &mut ExamSession) {
        if let Some(started_at) = self.started_at {
            session.started_at = started_at;
        }
        if let Some(time_remaining) = self.time_remaining {
            session.time_remaining = time_remaining;
        }
        if let Some(answers) = self.answers {
            session.answers = answers;
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("Session not found")]
    NotFound,
    #[error("An exam session is already in progress")]
    AlreadyExists,
    #[error("identifier must not contain ':'")]
    InvalidId,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode exam session: {0}")]
    Encode(#[from] serde_json::Error),
}

pub(crate) fn session_key(user_id: &str, exam_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{user_id}{KEY_SEPARATOR}{exam_id}")
}

/// Ids are joined with `:` inside the key, so neither may contain it.
pub(crate) fn is_key_segment(value: &str) -> bool {
    !value.contains(KEY_SEPARATOR)
}

fn validate_key_segment(value: &str) -> Result<(), ValidationError> {
    if is_key_segment(value) {
        Ok(())
    } else {
        Err(ValidationError::new("key_segment").with_message("must not contain ':'".into()))
    }
}

fn checked_key(user_id: &str, exam_id: &str) -> Result<String, SessionError> {
    if is_key_segment(user_id) && is_key_segment(exam_id) {
        Ok(session_key(user_id, exam_id))
    } else {
        Err(SessionError::InvalidId)
    }
}

/// Parses a stored payload, treating anything malformed or schema-invalid as no session.
pub(crate) fn decode_session(raw: &str) -> Option<ExamSession> {
    let session = match serde_json::from_str::<ExamSession>(raw) {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "Discarding undecodable exam session payload");
            metrics::record_session_decode_failure();
            return None;
        }
    };

    if let Err(err) = session.validate() {
        tracing::warn!(error = %err, "Discarding exam session that failed validation");
        metrics::record_session_decode_failure();
        return None;
    }

    Some(session)
}

#[derive(Clone)]
pub(crate) struct ExamSessionService {
    store: Arc<dyn KeyValueStore>,
    ttl_seconds: u64,
}

impl ExamSessionService {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    pub(crate) fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Current session, or `None` when it is missing, expired, or unreadable.
    ///
    /// Store failures and invalid ids are logged and also reported as `None`.
    pub(crate) async fn get(&self, user_id: &str, exam_id: &str) -> Option<ExamSession> {
        let key = self.key_or_log(user_id, exam_id)?;
        match self.store.get(&key).await {
            Ok(Some(raw)) => decode_session(&raw),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    user_id = %user_id,
                    exam_id = %exam_id,
                    "Failed to read exam session; treating as absent"
                );
                None
            }
        }
    }

    /// Seconds until the session lapses without further writes.
    pub(crate) async fn expires_in(&self, user_id: &str, exam_id: &str) -> Option<u64> {
        let key = self.key_or_log(user_id, exam_id)?;
        match self.store.ttl(&key).await {
            Ok(remaining) => remaining,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    user_id = %user_id,
                    exam_id = %exam_id,
                    "Failed to read exam session expiry"
                );
                None
            }
        }
    }

    /// Stores a fresh attempt. Rejects with `AlreadyExists` while a readable session is live.
    pub(crate) async fn create(&self, session: &ExamSession) -> Result<(), SessionError> {
        let key = checked_key(&session.user_id, &session.exam_id)?;
        if let Some(raw) = self.store.get(&key).await? {
            if decode_session(&raw).is_some() {
                return Err(SessionError::AlreadyExists);
            }
        }

        self.write(session).await?;
        metrics::record_session_created();
        tracing::info!(
            user_id = %session.user_id,
            exam_id = %session.exam_id,
            time_remaining = session.time_remaining,
            ttl_seconds = self.ttl_seconds,
            "Exam session created"
        );
        Ok(())
    }

    pub(crate) async fn update(
        &self,
        user_id: &str,
        exam_id: &str,
        patch: SessionPatch,
    ) -> Result<ExamSession, SessionError> {
        self.modify(user_id, exam_id, |session| patch.apply(session)).await
    }

    pub(crate) async fn update_answer(
        &self,
        user_id: &str,
        exam_id: &str,
        question_id: &str,
        answer: Option<String>,
    ) -> Result<ExamSession, SessionError> {
        self.modify(user_id, exam_id, |session| {
            session.answers.insert(question_id.to_string(), answer);
        })
        .await
    }

    pub(crate) async fn update_time_remaining(
        &self,
        user_id: &str,
        exam_id: &str,
        seconds: u32,
    ) -> Result<ExamSession, SessionError> {
        let patch = SessionPatch { time_remaining: Some(seconds), ..Default::default() };
        self.update(user_id, exam_id, patch).await
    }

    /// Restarts the TTL without touching the stored value.
    pub(crate) async fn extend(&self, user_id: &str, exam_id: &str) -> Result<(), SessionError> {
        let key = checked_key(user_id, exam_id)?;
        if self.store.reset_ttl(&key, self.ttl_seconds).await? {
            Ok(())
        } else {
            Err(SessionError::NotFound)
        }
    }

    pub(crate) async fn delete(&self, user_id: &str, exam_id: &str) -> Result<(), SessionError> {
        self.store.delete(&checked_key(user_id, exam_id)?).await?;
        tracing::debug!(user_id = %user_id, exam_id = %exam_id, "Exam session deleted");
        Ok(())
    }

    pub(crate) async fn get_time_remaining(&self, user_id: &str, exam_id: &str) -> Option<u32> {
        self.get(user_id, exam_id).await.map(|session| session.time_remaining)
    }

    async fn modify<F>(
        &self,
        user_id: &str,
        exam_id: &str,
        mutate: F,
    ) -> Result<ExamSession, SessionError>
    where
        F: FnOnce(&mut ExamSession) + Send,
    {
        let raw = self.store.get(&checked_key(user_id, exam_id)?).await?;
        let mut session = raw.as_deref().and_then(decode_session).ok_or(SessionError::NotFound)?;

        mutate(&mut session);
        // identity fields always follow the key
        session.user_id = user_id.to_string();
        session.exam_id = exam_id.to_string();

        self.write(&session).await?;
        Ok(session)
    }

    fn key_or_log(&self, user_id: &str, exam_id: &str) -> Option<String> {
        match checked_key(user_id, exam_id) {
            Ok(key) => Some(key),
            Err(_) => {
                tracing::debug!(user_id = %user_id, exam_id = %exam_id, "Rejected session ids");
                None
            }
        }
    }

    async fn write(&self, session: &ExamSession) -> Result<(), SessionError> {
        let key = checked_key(&session.user_id, &session.exam_id)?;
        let payload = serde_json::to_string(session)?;
        self.store.set_with_ttl(&key, &payload, self.ttl_seconds).await?;
        Ok(())
    }
}
