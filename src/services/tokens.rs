//! Signed, time-bounded identity tokens.
//!
//! Tokens carry the owning user's id and an expiry; nothing is stored
//! server-side and there is no revocation list. A token that was "logged
//! out" client-side stays valid until it expires.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::AuthConfig;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Owning user id, stringified
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|_| anyhow::anyhow!("Unknown signing algorithm: {}", config.algorithm))?;

        // The signing key is a shared secret, which rules out the
        // asymmetric algorithm families
        anyhow::ensure!(
            matches!(
                algorithm,
                Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
            ),
            "Signing algorithm {} is not an HMAC variant",
            config.algorithm
        );

        let mut validation = Validation::new(algorithm);
        // Expiry is a hard bound: a token is rejected at exactly exp
        validation.leeway = 0;

        let ttl = i64::try_from(config.token_ttl_seconds)
            .context("Token TTL does not fit in a signed 64-bit value")?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl),
        })
    }

    /// Issue a token for `user_id` expiring one TTL from now.
    pub fn issue(&self, user_id: i32) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: i32, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {e}"))
    }

    /// Resolve a token to the user id it was issued for.
    ///
    /// Signature mismatch, malformed payload and expiry all verify as
    /// `None`; callers never learn which check rejected the token.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<i32> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;
        data.claims.sub.parse().ok()
    }
}
