//! Session store: the server-side authority for token redeemability
//!
//! Two logical key spaces, both keyed by the raw token string:
//! access token -> [`SessionRecord`], refresh token -> subject id. Signature
//! expiry stays authoritative for *validity*; presence in this store is
//! authoritative for *revocability*. The request gate checks both.

mod redis_store;

pub use redis_store::RedisSessionStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::SessionRecord;

/// Infrastructure failure talking to the backing store.
///
/// Deliberately distinct from "key absent": an absent entry is a normal
/// outcome (expired or never issued) and is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store unreachable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Upsert the session bound to `access_token`. An existing entry is
    /// deleted first so the TTL is always reset, never inherited.
    async fn put_session(
        &self,
        access_token: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    async fn get_session(&self, access_token: &str)
        -> Result<Option<SessionRecord>, StoreError>;

    /// Upsert the refresh binding: refresh token -> subject id.
    async fn put_binding(
        &self,
        refresh_token: &str,
        subject: &str,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    async fn get_binding(&self, refresh_token: &str) -> Result<Option<String>, StoreError>;

    /// Best-effort removal; deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
