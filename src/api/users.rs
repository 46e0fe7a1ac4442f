// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{Auth, AuthError, SelfOnly},
    error::ApiError,
    models::{CreateUserRequest, CreatedUserResponse, UpdateUserRequest, UserResponse},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses((status = 200, body = [UserResponse]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.list()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Register a user and issue a token bound to the new id.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 201, body = CreatedUserResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    request.validate()?;
    let user = state.db.create(request.into())?;

    let issuer = state.issuer.clone();
    let user_id = user.id;
    let issued = tokio::task::spawn_blocking(move || issuer.issue(user_id))
        .await
        .unwrap_or_else(|e| Err(AuthError::InternalError(e.to_string())));

    let token = match issued {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(user_id, error = %e, "Token issuance failed");
            // A user without a token would be unreachable; drop the record.
            if let Err(rollback) = state.db.delete(user_id) {
                tracing::error!(user_id, error = %rollback, "Rollback of new user failed");
            }
            return Err(e.into());
        }
    };

    tracing::info!(user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user: user.into(),
            token,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Auth(_caller): Auth,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .get(id)?
        .ok_or_else(|| ApiError::not_found(format!("User {id} not found")))?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = u64, Path, description = "User id; must be the caller")),
    request_body = UpdateUserRequest,
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Not the owner of this record"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    SelfOnly(caller): SelfOnly,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;
    let user = state.db.update(caller.user_id, request.into())?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = u64, Path, description = "User id; must be the caller")),
    tag = "Users",
    responses(
        (status = 204),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Not the owner of this record"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    SelfOnly(caller): SelfOnly,
) -> Result<StatusCode, ApiError> {
    state.db.delete(caller.user_id)?;
    tracing::info!(user_id = caller.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{test_state, TEST_NOW};
    use crate::auth::AuthenticatedUser;

    fn signup(email: &str, username: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            username: username.into(),
            public_key: "pk".into(),
            encrypted_private_key: "sealed".into(),
        }
    }

    fn caller(user_id: u64) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            expires_at: TEST_NOW,
        }
    }

    #[tokio::test]
    async fn create_user_issues_verifiable_token() {
        let (state, _dir) = test_state();

        let (status, Json(created)) =
            create_user(State(state.clone()), Json(signup("a@example.com", "alice")))
                .await
                .expect("user creation succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.user.id, 1);
        assert_eq!(created.user.username, "alice");

        let verified = state
            .verifier
            .verify(&created.token, &created.user.id.to_string())
            .expect("issued token verifies");
        assert_eq!(verified.user_id, 1);
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_body() {
        let (state, _dir) = test_state();

        let err = create_user(State(state.clone()), Json(signup("not-an-email", "alice")))
            .await
            .expect_err("invalid email rejected");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.db.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let (state, _dir) = test_state();
        create_user(State(state.clone()), Json(signup("a@example.com", "alice")))
            .await
            .unwrap();

        let err = create_user(State(state), Json(signup("A@Example.com", "other")))
            .await
            .expect_err("duplicate email rejected");
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn list_users_hides_private_keys() {
        let (state, _dir) = test_state();
        create_user(State(state.clone()), Json(signup("a@example.com", "alice")))
            .await
            .unwrap();
        create_user(State(state.clone()), Json(signup("b@example.com", "bob")))
            .await
            .unwrap();

        let Json(users) = list_users(State(state)).await.unwrap();
        assert_eq!(users.len(), 2);
        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("sealed"));
    }

    #[tokio::test]
    async fn get_user_not_found() {
        let (state, _dir) = test_state();

        let err = get_user(State(state), Auth(caller(1)), Path(99))
            .await
            .expect_err("unknown id");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_and_delete_own_record() {
        let (state, _dir) = test_state();
        create_user(State(state.clone()), Json(signup("a@example.com", "alice")))
            .await
            .unwrap();

        let Json(updated) = update_user(
            State(state.clone()),
            SelfOnly(caller(1)),
            Json(UpdateUserRequest {
                username: Some("alicia".into()),
                otp_verified: Some(true),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.username, "alicia");
        assert!(updated.otp_verified);
        assert_eq!(updated.email, "a@example.com");

        let status = delete_user(State(state.clone()), SelfOnly(caller(1)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.db.get(1).unwrap().is_none());
    }

    #[tokio::test]
    async fn update_rejects_empty_username() {
        let (state, _dir) = test_state();
        create_user(State(state.clone()), Json(signup("a@example.com", "alice")))
            .await
            .unwrap();

        let err = update_user(
            State(state),
            SelfOnly(caller(1)),
            Json(UpdateUserRequest {
                username: Some(" ".into()),
                ..Default::default()
            }),
        )
        .await
        .expect_err("empty username rejected");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
