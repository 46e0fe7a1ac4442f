// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. outer HS256 signature (anything unparseable counts as a bad signature)
//! 2. payload shape
//! 3. expiry, strictly in the future
//! 4. the embedded `sign` hash against the caller's claimed identity

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::{AuthError, AuthSettings, AuthenticatedUser, TokenClaims};

/// Validates tokens produced by [`TokenIssuer`](super::TokenIssuer).
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against a caller-supplied clock, without leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(&settings.secret),
            validation,
        }
    }

    /// Verify `token` for the identity claimed out-of-band (decimal user id).
    ///
    /// bcrypt is CPU-bound; async callers should run this on the blocking pool.
    pub fn verify(&self, token: &str, claimed_id: &str) -> Result<AuthenticatedUser, AuthError> {
        self.verify_at(token, claimed_id, Utc::now().timestamp())
    }

    /// Verify as if the current time were `now` (Unix seconds).
    pub fn verify_at(
        &self,
        token: &str,
        claimed_id: &str,
        now: i64,
    ) -> Result<AuthenticatedUser, AuthError> {
        if token.is_empty() || claimed_id.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let payload = decode::<serde_json::Value>(token, &self.key, &self.validation)
            .map_err(|_| AuthError::InvalidSignature)?
            .claims;

        let claims: TokenClaims =
            serde_json::from_value(payload).map_err(|_| AuthError::MalformedClaims)?;

        if claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }

        // A hash that bcrypt cannot parse is treated the same as a mismatch.
        if !bcrypt::verify(claimed_id, &claims.sign).unwrap_or(false) {
            return Err(AuthError::IdentityMismatch);
        }

        let user_id = claimed_id
            .parse::<u64>()
            .map_err(|_| AuthError::IdentityMismatch)?;

        Ok(AuthenticatedUser {
            user_id,
            expires_at: claims.exp,
        })
    }
}
