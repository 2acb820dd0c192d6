use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{cmd, Client, RedisError};
use tokio::sync::RwLock;

use crate::core::session_store::{KeyValueStore, StoreError};

#[derive(Clone)]
pub(crate) struct RedisHandle {
    url: String,
    manager: Arc<RwLock<Option<ConnectionManager>>>,
}

#[derive(Debug, Clone)]
pub(crate) enum RedisHealth {
    Healthy,
    Disconnected,
    Unhealthy(String),
}

impl RedisHandle {
    pub(crate) fn new(url: String) -> Self {
        Self { url, manager: Arc::new(RwLock::new(None)) }
    }

    pub(crate) async fn connect(&self) -> Result<(), RedisError> {
        let client = Client::open(self.url.clone())?;
        let manager = ConnectionManager::new(client).await?;
        let mut guard = self.manager.write().await;
        *guard = Some(manager);
        Ok(())
    }

    pub(crate) async fn disconnect(&self) {
        let mut guard = self.manager.write().await;
        *guard = None;
    }

    pub(crate) async fn health(&self) -> RedisHealth {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return RedisHealth::Disconnected;
        };

        match cmd("PING").query_async::<_, String>(&mut manager).await {
            Ok(_) => RedisHealth::Healthy,
            Err(err) => RedisHealth::Unhealthy(err.to_string()),
        }
    }

    async fn manager(&self) -> Result<ConnectionManager, StoreError> {
        self.manager.read().await.clone().ok_or(StoreError::Disconnected)
    }
}

#[async_trait]
impl KeyValueStore for RedisHandle {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut manager = self.manager().await?;
        let value = cmd("GET").arg(key).query_async::<_, Option<String>>(&mut manager).await?;
        Ok(value)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        let mut manager = self.manager().await?;
        cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<_, ()>(&mut manager)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut manager = self.manager().await?;
        cmd("DEL").arg(key).query_async::<_, i64>(&mut manager).await?;
        Ok(())
    }

    async fn reset_ttl(&self, key: &str, ttl_seconds: u64) -> Result<bool, StoreError> {
        let mut manager = self.manager().await?;
        let updated: i64 =
            cmd("EXPIRE").arg(key).arg(ttl_seconds).query_async(&mut manager).await?;
        Ok(updated == 1)
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let mut manager = self.manager().await?;
        // -2: no such key, -1: key without expiry
        let remaining: i64 = cmd("TTL").arg(key).query_async(&mut manager).await?;
        Ok(u64::try_from(remaining).ok())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::RedisHandle;
    use crate::core::session_store::{KeyValueStore, StoreError};

    #[tokio::test]
    async fn disconnected_handle_reports_store_error() {
        let redis = RedisHandle::new("redis://127.0.0.1:6379/1".to_string());

        let err = redis.get("exam:session:u1:e1").await.unwrap_err();
        assert!(matches!(err, StoreError::Disconnected));
        assert!(matches!(redis.delete("exam:session:u1:e1").await, Err(StoreError::Disconnected)));
    }

    #[tokio::test]
    async fn disconnected_handle_reports_health() {
        let redis = RedisHandle::new("redis://127.0.0.1:6379/1".to_string());
        assert!(matches!(redis.health().await, super::RedisHealth::Disconnected));
    }
}
