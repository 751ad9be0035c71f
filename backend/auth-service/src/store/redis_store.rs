use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use super::{SessionStore, StoreError};
use crate::models::SessionRecord;

/// Redis-backed session store.
///
/// Keys are the raw token strings, values JSON. Every call runs under a
/// bounded timeout; an elapsed timeout is reported as unavailable, never as
/// absent, so an outage can never read as "not logged in".
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
    op_timeout: Duration,
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager, op_timeout: Duration) -> Self {
        Self { redis, op_timeout }
    }

    async fn run<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!(op, error = %e, "redis operation failed");
                Err(StoreError::Unavailable(e.to_string()))
            }
            Err(_) => {
                tracing::error!(op, timeout_ms = self.op_timeout.as_millis() as u64, "redis operation timed out");
                Err(StoreError::Unavailable(format!("{op} timed out")))
            }
        }
    }

    async fn put_raw(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        let key = key.to_string();
        // Delete-first upsert: an existing entry must never keep its old TTL.
        let secs = ttl.as_secs().max(1);
        self.run("put", async move {
            let _: () = conn.del(&key).await?;
            let _: () = conn.set_ex(&key, value, secs).await?;
            Ok(())
        })
        .await
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.redis.clone();
        let key = key.to_string();
        self.run("get", async move { conn.get(&key).await }).await
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put_session(
        &self,
        access_token: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(record)
            .map_err(|e| StoreError::Unavailable(format!("encode session record: {e}")))?;
        self.put_raw(access_token, value, ttl).await
    }

    async fn get_session(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionRecord>, StoreError> {
        match self.get_raw(access_token).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Unavailable(format!("decode session record: {e}"))),
            None => Ok(None),
        }
    }

    async fn put_binding(
        &self,
        refresh_token: &str,
        subject: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.put_raw(refresh_token, subject.to_string(), ttl).await
    }

    async fn get_binding(&self, refresh_token: &str) -> Result<Option<String>, StoreError> {
        self.get_raw(refresh_token).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.redis.clone();
        let key = key.to_string();
        self.run("delete", async move {
            let _: () = conn.del(&key).await?;
            Ok(())
        })
        .await
    }
}
