//! In-memory doubles for the session store and the member directory, so the
//! lifecycle suite runs without Redis or Postgres.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use auth_service::error::{AuthError, Result as AuthResult};
use auth_service::models::{MemberAccount, SessionRecord};
use auth_service::services::{MemberDirectory, TokenService};
use auth_service::store::{SessionStore, StoreError};
use auth_service::AppState;
use jwt_codec::TokenCodec;

#[derive(Clone)]
enum Stored {
    Session(SessionRecord),
    Binding(String),
}

struct Entry {
    value: Stored,
    expires_at: Instant,
}

/// TTL-honoring in-memory store; can be flipped into an "unreachable"
/// state to exercise the fail-closed paths.
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
    unavailable: AtomicBool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline (test)".to_string()))
        } else {
            Ok(())
        }
    }

    fn put(&self, key: &str, value: Stored, ttl: Duration) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Stored>, StoreError> {
        self.check_reachable()?;
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_session(
        &self,
        access_token: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.put(access_token, Stored::Session(record.clone()), ttl)
    }

    async fn get_session(
        &self,
        access_token: &str,
    ) -> Result<Option<SessionRecord>, StoreError> {
        Ok(match self.get(access_token)? {
            Some(Stored::Session(record)) => Some(record),
            _ => None,
        })
    }

    async fn put_binding(
        &self,
        refresh_token: &str,
        subject: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.put(refresh_token, Stored::Binding(subject.to_string()), ttl)
    }

    async fn get_binding(&self, refresh_token: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.get(refresh_token)? {
            Some(Stored::Binding(subject)) => Some(subject),
            _ => None,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// In-memory member directory standing in for the Postgres-backed one.
pub struct StubDirectory {
    members: Mutex<HashMap<String, MemberAccount>>,
}

impl StubDirectory {
    pub fn empty() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_member(id: &str, role: &str) -> Self {
        let directory = Self::empty();
        directory.members.lock().unwrap().insert(
            id.to_string(),
            MemberAccount {
                id: id.to_string(),
                password_hash: String::new(),
                role: role.to_string(),
            },
        );
        directory
    }
}

#[async_trait]
impl MemberDirectory for StubDirectory {
    async fn find_member(&self, member_id: &str) -> AuthResult<Option<MemberAccount>> {
        Ok(self.members.lock().unwrap().get(member_id).cloned())
    }

    async fn create_member(
        &self,
        member_id: &str,
        password_hash: &str,
        _name: &str,
        role: &str,
    ) -> AuthResult<()> {
        let mut members = self.members.lock().unwrap();
        if members.contains_key(member_id) {
            return Err(AuthError::MemberAlreadyExists);
        }
        members.insert(
            member_id.to_string(),
            MemberAccount {
                id: member_id.to_string(),
                password_hash: password_hash.to_string(),
                role: role.to_string(),
            },
        );
        Ok(())
    }
}

pub fn test_secret() -> String {
    STANDARD.encode(b"planora-integration-test-signing-key!!!!")
}

pub fn test_state_with_ttls(
    store: Arc<MemorySessionStore>,
    directory: Arc<StubDirectory>,
    access_ttl: Duration,
    refresh_ttl: Duration,
) -> AppState {
    let codec = Arc::new(TokenCodec::from_base64_secret(&test_secret()).unwrap());
    let tokens = TokenService::new(
        codec.clone(),
        store.clone(),
        directory.clone(),
        access_ttl,
        refresh_ttl,
    );

    AppState {
        directory,
        codec,
        sessions: store,
        tokens,
    }
}

pub fn test_state(store: Arc<MemorySessionStore>, directory: Arc<StubDirectory>) -> AppState {
    test_state_with_ttls(
        store,
        directory,
        Duration::from_secs(180),
        Duration::from_secs(10_800),
    )
}
