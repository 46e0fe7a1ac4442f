// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Identity-bound bearer tokens for the Portal API.
//!
//! ## Token Format
//!
//! A compact HS256 JWT whose payload is `{"exp": <unix secs>, "sign": <bcrypt>}`.
//! `sign` hashes the decimal user id, so a token only verifies together with
//! the user id it was issued for. Clients send:
//!
//! - `Authorization: Bearer <token>` (or `x-access-token: <token>`)
//! - `x-key: <user id>`
//!
//! ## Admission
//!
//! - Exempt `(path, method)` pairs skip authentication entirely
//! - Missing token or key is rejected before any verification
//! - Otherwise signature, expiry and identity binding are checked in that order
//!
//! Tokens are stateless; nothing is stored server-side and there is no revocation.

pub mod claims;
pub mod error;
pub mod exemption;
pub mod extractor;
pub mod issuer;
pub mod middleware;
pub mod settings;
pub mod verifier;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use exemption::ExemptionPolicy;
pub use extractor::{Auth, SelfOnly};
pub use issuer::TokenIssuer;
pub use middleware::{require_auth, Credentials};
pub use settings::{AuthSettings, SECONDS_PER_DAY};
pub use verifier::TokenVerifier;
