// HTTP handlers for user endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Handler for POST /users
/// Registers a new user; open to unauthenticated callers
pub async fn create_user_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<UserResponse>), ApiError> {
    tracing::debug!("Registering user '{}'", payload.username);

    // Validate the request using validator crate
    payload.validate()?;

    let user = state.user_service.create_user(payload).await?;

    tracing::info!("Registered user {} ('{}')", user.id, user.username);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/users/{}", user.id))],
        Json(UserResponse::from(user)),
    ))
}

/// Handler for GET /users
/// Retrieves all users (admin only)
pub async fn list_users_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users_repo.find_all().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Handler for GET /users/{id}
/// Retrieves a user by ID (owner or admin)
pub async fn get_user_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users_repo
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "User".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// Handler for PATCH /users/{id}
/// Partially updates a user (owner or admin)
pub async fn update_user_handler(
    State(state): State<crate::AppState>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    // Validate the request using validator crate
    payload.validate()?;

    if payload.is_empty() {
        return Err(ApiError::BadRequest {
            message: "No fields to update".to_string(),
        });
    }

    state.user_service.update_user(id, payload).await?;

    tracing::info!("User {} updated by '{}'", id, current_user.username);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /users/{id}
/// Deletes a user and the role row they own (owner or admin)
pub async fn delete_user_handler(
    State(state): State<crate::AppState>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.users_repo.delete(id).await?;

    tracing::info!("User {} deleted by '{}'", id, current_user.username);
    Ok(StatusCode::NO_CONTENT)
}
