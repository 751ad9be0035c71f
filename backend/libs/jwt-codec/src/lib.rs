//! Signed bearer-token codec shared by the Planora services
//!
//! Wraps `jsonwebtoken` with the claim set the platform uses (subject,
//! issued-at, expiry) and a typed verification outcome so callers handle
//! every failure kind explicitly instead of catching opaque errors.
//!
//! The codec is pure computation: no I/O, no async, no clock injection
//! beyond `Utc::now()` at issue/verify time. Whether a token is still
//! *redeemable* (not revoked server-side) is the session store's concern,
//! not this crate's.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Why a token failed verification.
///
/// Mirrors the four expected failure classes of the wire format; anything a
/// caller supplied that cannot even be treated as a token is
/// `InvalidArgument`, a structurally broken or wrongly signed token is
/// `Malformed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("unsupported token format")]
    Unsupported,
    #[error("invalid token argument")]
    InvalidArgument,
}

/// HS256 codec holding the process-wide signing key.
///
/// Constructed once at startup from the base64-encoded secret; construction
/// failure is a configuration error and must abort startup, never be
/// deferred to request time.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build the codec from a base64-encoded HS256 secret.
    pub fn from_base64_secret(secret: &str) -> Result<Self> {
        let encoding = EncodingKey::from_base64_secret(secret)
            .context("JWT_SECRET is not valid base64")?;
        let decoding = DecodingKey::from_base64_secret(secret)
            .context("JWT_SECRET is not valid base64")?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked to the second; the session store TTL is already
        // capped at the signed lifetime, so no leeway is wanted here.
        validation.leeway = 0;

        Ok(Self {
            encoding,
            decoding,
            validation,
        })
    }

    /// Issue a signed token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: std::time::Duration) -> Result<String> {
        let ttl = Duration::from_std(ttl).context("token TTL out of range")?;
        let now = Utc::now();

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("failed to encode token")
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, VerifyError> {
        if token.trim().is_empty() {
            return Err(VerifyError::InvalidArgument);
        }

        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    VerifyError::Unsupported
                }
                // Bad signature, bad structure, bad base64, bad JSON and the
                // rest are all one class to the caller.
                _ => VerifyError::Malformed,
            }),
        }
    }
}
