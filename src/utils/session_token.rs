//! Session token codec.
//!
//! A token is `base64url(payload) "." base64url(tag)` where `payload` is the
//! compact JSON claim, a newline, and the issuance time in Unix milliseconds,
//! and `tag` is HMAC-SHA256 over `payload`. Compact JSON never contains a raw
//! newline, so the delimiter cannot collide with claim text.

use std::{collections::HashSet, env};

use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::routes::auth::claims::Claims;

type HmacSha256 = Hmac<Sha256>;

/// Minimum acceptable size for the session secret in bytes.
pub const MIN_SESSION_SECRET_LENGTH: usize = 32;
/// Minimum number of unique bytes expected for the session secret to avoid trivially guessable values.
const MIN_UNIQUE_SECRET_BYTES: usize = 8;

pub const SESSION_MAX_AGE_DAYS: i64 = 7;
/// How far into the future an issuance time may lie before the token is refused.
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 300;

const PAYLOAD_DELIMITER: char = '\n';
const TAG_SEPARATOR: char = '.';

#[derive(Debug, Error)]
pub enum SessionSecretError {
    #[error("SESSION_SECRET must be set")]
    Missing,
    #[error(
        "SESSION_SECRET must be at least {required} bytes, but {actual} bytes were provided"
    )]
    TooShort { actual: usize, required: usize },
    #[error(
        "SESSION_SECRET must contain sufficient entropy (at least {required} unique bytes); only {actual} unique bytes found"
    )]
    LowEntropy { actual: usize, required: usize },
    #[error("SESSION_SECRET could not be used as an HMAC key")]
    Unusable,
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum SessionTokenError {
    #[error("session token is malformed")]
    Malformed,
    #[error("session token integrity check failed")]
    Tampered,
    #[error("session token carries an unreadable claim")]
    UnparseableClaim,
    #[error("session token has expired")]
    Expired,
}

#[derive(Clone)]
pub struct SessionKeys {
    mac: HmacSha256,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn from_env() -> Result<Self, SessionSecretError> {
        let value = env::var("SESSION_SECRET").map_err(|_| SessionSecretError::Missing)?;
        Self::from_secret(value)
    }

    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, SessionSecretError> {
        let bytes = secret.as_ref();
        validate_secret(bytes)?;

        let mac = HmacSha256::new_from_slice(bytes).map_err(|_| SessionSecretError::Unusable)?;
        Ok(Self { mac })
    }

    fn tag(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

fn validate_secret(secret: &[u8]) -> Result<(), SessionSecretError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(SessionSecretError::TooShort {
            actual: secret.len(),
            required: MIN_SESSION_SECRET_LENGTH,
        });
    }

    let unique = secret.iter().copied().collect::<HashSet<_>>().len();
    if unique < MIN_UNIQUE_SECRET_BYTES {
        return Err(SessionSecretError::LowEntropy {
            actual: unique,
            required: MIN_UNIQUE_SECRET_BYTES,
        });
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSession {
    pub claims: Claims,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionCodec {
    keys: SessionKeys,
    max_age: Duration,
    max_skew: Duration,
}

impl SessionCodec {
    pub fn new(keys: SessionKeys) -> Self {
        Self {
            keys,
            max_age: Duration::days(SESSION_MAX_AGE_DAYS),
            max_skew: Duration::seconds(MAX_CLOCK_SKEW_SECONDS),
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn encode(
        &self,
        claims: &Claims,
        issued_at: DateTime<Utc>,
    ) -> Result<String, serde_json::Error> {
        let data = serde_json::to_string(claims)?;
        let payload = format!(
            "{}{}{}",
            data,
            PAYLOAD_DELIMITER,
            issued_at.timestamp_millis()
        );
        let tag = self.keys.tag(payload.as_bytes());

        Ok(format!(
            "{}{}{}",
            BASE64_URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            TAG_SEPARATOR,
            BASE64_URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Decodes and validates `token` as of `now`. Total over arbitrary input.
    pub fn decode(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<DecodedSession, SessionTokenError> {
        let (payload_b64, tag_b64) = token
            .split_once(TAG_SEPARATOR)
            .ok_or(SessionTokenError::Malformed)?;
        if tag_b64.contains(TAG_SEPARATOR) {
            return Err(SessionTokenError::Malformed);
        }

        let payload = BASE64_URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| SessionTokenError::Malformed)?;
        let provided = BASE64_URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| SessionTokenError::Malformed)?;

        let expected = self.keys.tag(&payload);
        if expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() == 0u8 {
            return Err(SessionTokenError::Tampered);
        }

        let text = std::str::from_utf8(&payload).map_err(|_| SessionTokenError::Malformed)?;
        let mut parts = text.split(PAYLOAD_DELIMITER);
        let (data, timestamp) = match (parts.next(), parts.next(), parts.next()) {
            (Some(data), Some(timestamp), None) => (data, timestamp),
            _ => return Err(SessionTokenError::Malformed),
        };

        let issued_ms = timestamp
            .parse::<i64>()
            .map_err(|_| SessionTokenError::Malformed)?;
        let issued_at =
            DateTime::<Utc>::from_timestamp_millis(issued_ms).ok_or(SessionTokenError::Malformed)?;

        let claims: Claims =
            serde_json::from_str(data).map_err(|_| SessionTokenError::UnparseableClaim)?;

        // Age is compared in whole milliseconds, the unit the token carries.
        let age_ms = now.timestamp_millis() - issued_ms;
        if age_ms < -self.max_skew.num_milliseconds() {
            return Err(SessionTokenError::Malformed);
        }
        if age_ms > self.max_age.num_milliseconds() {
            return Err(SessionTokenError::Expired);
        }

        Ok(DecodedSession { claims, issued_at })
    }

    /// Single decision point for callers that only care whether a session is usable.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<Claims> {
        self.decode(token, now).ok().map(|session| session.claims)
    }
}
