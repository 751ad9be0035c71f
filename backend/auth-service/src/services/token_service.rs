//! Token lifecycle: issue on login, rotate on reissue, delete on logout
//!
//! The service owns the write/delete sequencing against the session store;
//! the request gate only ever reads.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use jwt_codec::TokenCodec;

use crate::error::{AuthError, Result};
use crate::models::{MemberAccount, SessionRecord, TokenPair};
use crate::store::SessionStore;

/// Identity collaborator: the single seam this service has on member
/// persistence.
///
/// A lookup miss during reissue means the refresh binding points at a member
/// that no longer exists; that is a reissue failure, never a 500.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn find_member(&self, member_id: &str) -> Result<Option<MemberAccount>>;

    /// Register a new member; an already-taken id is
    /// [`crate::error::AuthError::MemberAlreadyExists`].
    async fn create_member(
        &self,
        member_id: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct TokenService {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    directory: Arc<dyn MemberDirectory>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        directory: Arc<dyn MemberDirectory>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            sessions,
            directory,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Mint a fresh access + refresh pair and bind both in the store.
    ///
    /// Store TTLs equal the signed token lifetimes, so a record can never
    /// outlive the expiry claim of its token.
    pub async fn issue(&self, subject: &str, roles: Vec<String>) -> Result<TokenPair> {
        let access_token = self
            .codec
            .issue(subject, self.access_ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self
            .codec
            .issue(subject, self.refresh_ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let record = SessionRecord {
            subject: subject.to_string(),
            roles,
        };
        self.sessions
            .put_session(&access_token, &record, self.access_ttl)
            .await?;
        self.sessions
            .put_binding(&refresh_token, subject, self.refresh_ttl)
            .await?;

        tracing::info!(subject, "issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a valid refresh token for a new pair.
    ///
    /// Every failure collapses to [`AuthError::ReissueFailed`]; the old pair
    /// stays revoked even then, so the caller can only re-authenticate.
    pub async fn reissue(&self, old_access_token: &str, refresh_token: &str) -> Result<TokenPair> {
        match self.try_reissue(old_access_token, refresh_token).await {
            Ok(pair) => Ok(pair),
            Err(e) => {
                tracing::warn!(error = %e, "token reissue failed");
                Err(AuthError::ReissueFailed)
            }
        }
    }

    async fn try_reissue(&self, old_access_token: &str, refresh_token: &str) -> Result<TokenPair> {
        self.codec.verify(refresh_token)?;

        // The subject comes from the server-side binding, not from the
        // refresh token's own claims.
        let subject = self
            .sessions
            .get_binding(refresh_token)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        // Revoke the old pair before any new tokens exist. After this point
        // a failed reissue leaves the caller logged out, not holding a live
        // superseded pair.
        self.sessions.delete(old_access_token).await?;
        self.sessions.delete(refresh_token).await?;

        let member = self
            .directory
            .find_member(&subject)
            .await?
            .ok_or(AuthError::MemberNotFound)?;

        self.issue(&member.id, vec![member.role]).await
    }

    /// Logout: drop the session entry and, when the client supplies it, the
    /// refresh binding. Idempotent; already-absent keys are a no-op.
    pub async fn revoke(&self, access_token: &str, refresh_token: Option<&str>) -> Result<()> {
        self.sessions.delete(access_token).await?;
        if let Some(refresh_token) = refresh_token {
            self.sessions.delete(refresh_token).await?;
        }
        tracing::info!("revoked token pair");
        Ok(())
    }
}
