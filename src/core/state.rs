use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::{SessionBackend, Settings};
use crate::core::redis::RedisHandle;
use crate::core::session_store::{KeyValueStore, MemoryStore};
use crate::services::exam_catalog::{ExamContentRepository, PgExamContentRepository};
use crate::services::exam_results::{ExamResultRepository, PgExamResultRepository};
use crate::services::exam_sessions::ExamSessionService;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    redis: RedisHandle,
    sessions: ExamSessionService,
    exams: Arc<dyn ExamContentRepository>,
    results: Arc<dyn ExamResultRepository>,
}

impl AppState {
    /// Wires the Postgres repositories and the configured session store.
    pub(crate) fn new(settings: Settings, db: PgPool, redis: RedisHandle) -> Self {
        let store: Arc<dyn KeyValueStore> = match settings.session().backend {
            SessionBackend::Redis => Arc::new(redis.clone()),
            SessionBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let exams = Arc::new(PgExamContentRepository::new(db.clone()));
        let results = Arc::new(PgExamResultRepository::new(db.clone()));

        Self::from_parts(settings, db, redis, store, exams, results)
    }

    pub(crate) fn from_parts(
        settings: Settings,
        db: PgPool,
        redis: RedisHandle,
        store: Arc<dyn KeyValueStore>,
        exams: Arc<dyn ExamContentRepository>,
        results: Arc<dyn ExamResultRepository>,
    ) -> Self {
        let sessions = ExamSessionService::new(store, settings.session().ttl_seconds);
        Self { inner: Arc::new(InnerState { settings, db, redis, sessions, exams, results }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn redis(&self) -> &RedisHandle {
        &self.inner.redis
    }

    pub(crate) fn sessions(&self) -> &ExamSessionService {
        &self.inner.sessions
    }

    pub(crate) fn exams(&self) -> &dyn ExamContentRepository {
        self.inner.exams.as_ref()
    }

    pub(crate) fn results(&self) -> &dyn ExamResultRepository {
        self.inner.results.as_ref()
    }
}
