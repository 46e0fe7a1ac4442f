// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use super::{AuthError, AuthSettings, TokenClaims};

/// Signs user identities into time-limited tokens.
pub struct TokenIssuer {
    key: EncodingKey,
    cost: u32,
    validity_secs: i64,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            key: EncodingKey::from_secret(&settings.secret),
            cost: settings.cost,
            validity_secs: settings.validity_secs(),
        }
    }

    /// Issue a token for `user_id`, valid from now for the configured window.
    ///
    /// bcrypt is CPU-bound; async callers should run this on the blocking pool.
    pub fn issue(&self, user_id: u64) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, user_id: u64, now: i64) -> Result<String, AuthError> {
        let sign = bcrypt::hash(user_id.to_string(), self.cost)
            .map_err(|e| AuthError::SigningError(e.to_string()))?;

        let claims = TokenClaims {
            exp: now.saturating_add(self.validity_secs),
            sign,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AuthError::SigningError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn payload_of(token: &str) -> serde_json::Value {
        let payload = token.split('.').nth(1).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn token_is_compact_three_part_form() {
        let issuer = TokenIssuer::new(&AuthSettings::new("s3cr3t", 4, 1));
        let token = issuer.issue(42).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn expiry_is_now_plus_window() {
        let issuer = TokenIssuer::new(&AuthSettings::new("s3cr3t", 4, 3));
        let token = issuer.issue_at(42, 1_000).unwrap();
        assert_eq!(payload_of(&token)["exp"], 1_000 + 3 * 86_400);
    }

    #[test]
    fn payload_does_not_expose_identity() {
        let issuer = TokenIssuer::new(&AuthSettings::new("s3cr3t", 4, 1));
        let token = issuer.issue(987654321).unwrap();
        let payload = payload_of(&token);
        let sign = payload["sign"].as_str().unwrap();
        assert!(sign.starts_with("$2"));
        assert!(!payload.to_string().contains("987654321"));
    }

    #[test]
    fn each_issuance_uses_a_fresh_salt() {
        let issuer = TokenIssuer::new(&AuthSettings::new("s3cr3t", 4, 1));
        let a = issuer.issue_at(42, 1_000).unwrap();
        let b = issuer.issue_at(42, 1_000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unsupported_cost_is_a_signing_error() {
        let issuer = TokenIssuer::new(&AuthSettings::new("s3cr3t", 3, 1));
        assert!(matches!(issuer.issue(42), Err(AuthError::SigningError(_))));

        let issuer = TokenIssuer::new(&AuthSettings::new("s3cr3t", 32, 1));
        assert!(matches!(issuer.issue(42), Err(AuthError::SigningError(_))));
    }
}
