// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers behind [`require_auth`](super::require_auth):
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser};

/// Extractor for the user admitted by the auth middleware.
///
/// Rejects with [`AuthError::MissingCredentials`] when the route was reached
/// without authentication (e.g. an exempt route).
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Extractor for the authenticated user acting on their own record.
///
/// Reads the `{id}` path parameter and rejects with
/// [`AuthError::InsufficientPermissions`] when it names another user.
pub struct SelfOnly(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for SelfOnly
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let Path(id) = Path::<u64>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !user.is(id) {
            return Err(AuthError::InsufficientPermissions.into_response());
        }

        Ok(SelfOnly(user))
    }
}
