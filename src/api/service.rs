// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::models::MessageResponse;

pub const GREETING: &str = "Hello World";

#[utoipa::path(
    get,
    path = "/",
    tag = "Service",
    responses((status = 200, body = MessageResponse))
)]
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: GREETING.to_string(),
    })
}
