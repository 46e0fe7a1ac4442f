// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Method,
    middleware,
    routing::get,
    Json, Router,
};
use tower::{Layer, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};
use utoipa::OpenApi;

use crate::{
    auth::{require_auth, AuthenticatedUser, ExemptionPolicy},
    models::{
        CreateUserRequest, CreatedUserResponse, MessageResponse, UpdateUserRequest, UserResponse,
    },
    state::AppState,
};

pub mod health;
pub mod service;
pub mod trace;
pub mod users;

pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Routes reachable without credentials.
pub fn default_exemptions() -> ExemptionPolicy {
    ExemptionPolicy::new()
        .allow("/", [Method::GET.as_str()])
        .allow("/health", [Method::GET.as_str()])
        .allow("/users", [Method::GET.as_str(), Method::POST.as_str()])
        .allow(OPENAPI_PATH, [Method::GET.as_str()])
}

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(service::hello))
        .route("/health", get(health::health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(OPENAPI_PATH, get(openapi_json))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(trace::http_trace_layer())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CorsLayer::permissive()),
    )
}

/// Full application: [`router`] behind trailing-slash normalization, so
/// `/users/` is routed and exemption-checked as `/users`.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        service::hello,
        health::health,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user
    ),
    components(
        schemas(
            MessageResponse,
            UserResponse,
            CreatedUserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            AuthenticatedUser,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Service", description = "Service greeting"),
        (name = "Health", description = "Liveness and database probe"),
        (name = "Users", description = "User records; protected routes need `Authorization: Bearer <token>` and `x-key: <user id>`")
    )
)]
pub struct ApiDoc;
