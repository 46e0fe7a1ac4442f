// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs for every routed request:
//!
//! 1. exempt `(path, method)` pairs pass straight through
//! 2. the token and the claimed user id are read from headers; either one
//!    missing is rejected without touching the verifier
//! 3. the token is verified on the blocking pool and the resulting
//!    [`AuthenticatedUser`] is stored in request extensions
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/users/{id}", get(get_user))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AuthError;
use crate::state::AppState;

/// Fallback header carrying the raw token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Header carrying the claimed user id.
pub const USER_KEY_HEADER: &str = "x-key";

/// Token and claimed identity taken from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub claimed_id: String,
}

impl Credentials {
    /// Read credentials from request headers.
    ///
    /// The token comes from `Authorization: Bearer <token>` or, failing that,
    /// from `x-access-token`. The claimed user id comes from `x-key`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let token = bearer_token(headers)
            .or_else(|| header_value(headers, ACCESS_TOKEN_HEADER))
            .ok_or(AuthError::MissingCredentials)?;
        let claimed_id =
            header_value(headers, USER_KEY_HEADER).ok_or(AuthError::MissingCredentials)?;

        Ok(Self {
            token: token.to_string(),
            claimed_id: claimed_id.to_string(),
        })
    }
}

/// `Authorization` value of exactly the form `<bearer> <token>`, scheme case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Some(token)
        }
        _ => None,
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().as_str();
    let path = request.uri().path();

    if state.exemptions.is_exempt(path, method) {
        return next.run(request).await;
    }

    let credentials = match Credentials::from_headers(request.headers()) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::debug!(%method, %path, error_code = e.error_code(), "Request rejected");
            return e.into_response();
        }
    };

    let verifier = state.verifier.clone();
    let verified = tokio::task::spawn_blocking(move || {
        verifier.verify(&credentials.token, &credentials.claimed_id)
    })
    .await
    .unwrap_or_else(|e| Err(AuthError::InternalError(e.to_string())));

    match verified {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                error_code = e.error_code(),
                "Request rejected"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn reads_bearer_token_and_key() {
        let creds = Credentials::from_headers(&headers(&[
            ("authorization", "Bearer abc.def.ghi"),
            ("x-key", "42"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "abc.def.ghi");
        assert_eq!(creds.claimed_id, "42");
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let creds = Credentials::from_headers(&headers(&[
            ("authorization", "bEaReR tok"),
            ("x-key", "1"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "tok");
    }

    #[test]
    fn falls_back_to_access_token_header() {
        let creds = Credentials::from_headers(&headers(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            ("x-access-token", "tok"),
            ("x-key", "1"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "tok");

        let creds = Credentials::from_headers(&headers(&[
            ("authorization", "Bearer a b"),
            ("x-access-token", "tok2"),
            ("x-key", "1"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "tok2");
    }

    #[test]
    fn bearer_header_wins_over_access_token_header() {
        let creds = Credentials::from_headers(&headers(&[
            ("authorization", "Bearer first"),
            ("x-access-token", "second"),
            ("x-key", "1"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "first");
    }

    #[test]
    fn missing_token_or_key_is_missing_credentials() {
        assert_eq!(
            Credentials::from_headers(&headers(&[("x-key", "1")])),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            Credentials::from_headers(&headers(&[("authorization", "Bearer tok")])),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            Credentials::from_headers(&headers(&[
                ("authorization", "Bearer tok"),
                ("x-key", "")
            ])),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            Credentials::from_headers(&headers(&[("authorization", "Bearer "), ("x-key", "1")])),
            Err(AuthError::MissingCredentials)
        );
    }
}
