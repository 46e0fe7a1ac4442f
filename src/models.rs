// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! Stored fields that must not leave the service (the encrypted private key)
//! are dropped when converting a [`StoredUser`] into a [`UserResponse`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::storage::{NewUser, StoredUser, UserChanges};

// =============================================================================
// Generic Responses
// =============================================================================

/// Plain message response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    /// Numeric user id; also the value clients send in `x-key`.
    pub id: u64,
    pub email: String,
    pub username: String,
    pub public_key: String,
    pub otp_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            public_key: user.public_key,
            otp_verified: user.otp_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Newly created user together with a token bound to it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedUserResponse {
    pub user: UserResponse,
    /// Bearer token; send with `x-key: <user.id>`.
    pub token: String,
}

/// Request to create a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub encrypted_private_key: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_email(&self.email)?;
        validate_username(&self.username)
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            email: request.email,
            username: request.username.trim().to_string(),
            public_key: request.public_key,
            encrypted_private_key: request.encrypted_private_key,
        }
    }
}

/// Request to update a user. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub encrypted_private_key: Option<String>,
    #[serde(default)]
    pub otp_verified: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        Ok(())
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            username: request.username.map(|u| u.trim().to_string()),
            public_key: request.public_key,
            encrypted_private_key: request.encrypted_private_key,
            otp_verified: request.otp_verified,
        }
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::unprocessable("email must be a valid email address")),
    }
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::unprocessable("username must not be empty"));
    }
    Ok(())
}
