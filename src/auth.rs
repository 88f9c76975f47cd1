// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Password hashing and token issuing for the identity boundary.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{Error, Result};

/// Hash a password with a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Backend(anyhow::anyhow!("password hashing: {e}")))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenPurpose {
    Session,
    Reset,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    purpose: TokenPurpose,
}

/// Issues and checks the two token kinds: login sessions and short-lived
/// password-reset tokens. A reset token never passes as a session.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    session_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            session_ttl: Duration::hours(config.session_ttl_hours),
            reset_ttl: Duration::minutes(config.reset_ttl_minutes),
        }
    }

    pub fn issue_session(&self, account_id: &str) -> Result<String> {
        self.issue(account_id, TokenPurpose::Session, self.session_ttl)
    }

    pub fn issue_reset(&self, account_id: &str) -> Result<String> {
        self.issue(account_id, TokenPurpose::Reset, self.reset_ttl)
    }

    /// Returns the account id for a valid session token.
    pub fn verify_session(&self, token: &str) -> Result<String> {
        self.verify(token, TokenPurpose::Session)
    }

    /// Returns the account id for a valid reset token.
    pub fn verify_reset(&self, token: &str) -> Result<String> {
        self.verify(token, TokenPurpose::Reset)
    }

    fn issue(&self, account_id: &str, purpose: TokenPurpose, ttl: Duration) -> Result<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            exp: (Utc::now() + ttl).timestamp() as usize,
            purpose,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::Backend(anyhow::anyhow!("token encoding: {e}")))
    }

    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<String> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| Error::NotAuthenticated)?;
        if data.claims.purpose != purpose {
            return Err(Error::NotAuthenticated);
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            session_ttl_hours: 1,
            reset_ttl_minutes: 5,
        })
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }

    #[test]
    fn session_token_round_trip() {
        let issuer = issuer();
        let token = issuer.issue_session("acct1").unwrap();
        assert_eq!(issuer.verify_session(&token).unwrap(), "acct1");
    }

    #[test]
    fn reset_token_is_not_a_session() {
        let issuer = issuer();
        let token = issuer.issue_reset("acct1").unwrap();
        assert_eq!(issuer.verify_reset(&token).unwrap(), "acct1");
        assert!(matches!(
            issuer.verify_session(&token),
            Err(Error::NotAuthenticated)
        ));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(matches!(
            issuer().verify_session("garbage"),
            Err(Error::NotAuthenticated)
        ));
    }
}
