// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Database health report.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "up" or "down".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of stored users, when the database answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check endpoint handler.
///
/// Returns 200 when the database answers a read transaction, 503 otherwise.
/// A failing probe never stops the process.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.db.health() {
        Ok(db) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "up".to_string(),
                message: Some("Database connection is healthy".to_string()),
                users: Some(db.users),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "down".to_string(),
                    message: None,
                    users: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
