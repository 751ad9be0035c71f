use serde::{Deserialize, Serialize};

/// Server-side session bound to one access token.
///
/// Stored under the exact access-token string; the store TTL matches the
/// token's signed lifetime so a record can never outlive its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub subject: String,
    pub roles: Vec<String>,
}

/// Access + refresh pair returned by login and reissue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Member row as the identity lookup collaborator sees it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberAccount {
    pub id: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub id: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}
