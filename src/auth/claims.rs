// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload carried inside every issued token.
///
/// `sign` is a bcrypt hash of the user id's decimal form. It binds the token
/// to one identity without revealing it; the outer HS256 signature protects
/// the payload as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration timestamp (seconds since the epoch)
    pub exp: i64,
    /// Salted hash of the bound user id
    pub sign: String,
}

/// Authenticated user information established by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// User id asserted by the caller and proven by the token
    pub user_id: u64,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Check whether this user is the given user.
    pub fn is(&self, user_id: u64) -> bool {
        self.user_id == user_id
    }
}
