//! User management handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::api::server::AppState;
use crate::error::ScholarsError;
use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::repository::UserRepository;

/// List all users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ScholarsError> {
    let repo = UserRepository::new(state.db.pool().clone());
    let users = repo.get_all().await?;
    Ok(Json(users))
}

/// Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = UserRepository::new(state.db.pool().clone());
    let user = repo.get_by_id(id).await?;

    match user {
        Some(u) => Ok(Json(u)),
        None => Err(ScholarsError::NotFound(format!(
            "User with id {} not found",
            id
        ))),
    }
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ScholarsError> {
    if req.username.is_empty() {
        return Err(ScholarsError::InvalidRequest(
            "Username is required".to_string(),
        ));
    }
    if req.email.is_empty() {
        return Err(ScholarsError::InvalidRequest(
            "Email is required".to_string(),
        ));
    }

    let repo = UserRepository::new(state.db.pool().clone());
    let user = repo.create(&req).await?;

    info!(id = %user.id, username = %user.username, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = UserRepository::new(state.db.pool().clone());
    let user = repo.update(id, &req).await?;

    match user {
        Some(u) => {
            info!(id = %u.id, username = %u.username, "Updated user");
            Ok(Json(u))
        }
        None => Err(ScholarsError::NotFound(format!(
            "User with id {} not found",
            id
        ))),
    }
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = UserRepository::new(state.db.pool().clone());
    let deleted = repo.delete(id).await?;

    if deleted {
        info!(id = %id, "Deleted user");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ScholarsError::NotFound(format!(
            "User with id {} not found",
            id
        )))
    }
}
