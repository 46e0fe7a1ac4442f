// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Each variant maps to a distinct client remediation: supply credentials,
/// obtain a fresh token, or stop using a token that was never valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token or claimed identity missing from the request
    MissingCredentials,
    /// Token is malformed, uses another algorithm, or its signature does not verify
    InvalidSignature,
    /// Signature verified but the payload is not a token we issued
    MalformedClaims,
    /// Token has expired
    TokenExpired,
    /// Token is not bound to the claimed identity
    IdentityMismatch,
    /// Hashing or signing primitive failed while issuing a token
    SigningError(String),
    /// Authenticated user may not act on this resource
    InsufficientPermissions,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::MalformedClaims => "malformed_claims",
            AuthError::TokenExpired => "token_expired",
            AuthError::IdentityMismatch => "identity_mismatch",
            AuthError::SigningError(_) => "signing_error",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidSignature
            | AuthError::MalformedClaims
            | AuthError::TokenExpired
            | AuthError::IdentityMismatch => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::SigningError(_) | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "Authentication required: token or key is missing")
            }
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::MalformedClaims => write!(f, "Token claims are malformed"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::IdentityMismatch => write!(f, "Token does not belong to the claimed user"),
            AuthError::SigningError(msg) => write!(f, "Failed to sign token: {msg}"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
