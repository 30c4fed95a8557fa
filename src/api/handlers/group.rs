//! Study group management handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::api::server::AppState;
use crate::error::ScholarsError;
use crate::models::{AddMemberRequest, CreateGroupRequest, UpdateGroupRequest};
use crate::repository::GroupRepository;

/// List all study groups
pub async fn list_groups(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());
    let groups = repo.get_all().await?;
    Ok(Json(groups))
}

/// Get a single study group
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());
    let group = repo.get_by_id(id).await?;

    match group {
        Some(g) => Ok(Json(g)),
        None => Err(ScholarsError::NotFound(format!(
            "Group with id {} not found",
            id
        ))),
    }
}

/// Create a new study group
pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ScholarsError> {
    if req.name.is_empty() {
        return Err(ScholarsError::InvalidRequest(
            "Group name is required".to_string(),
        ));
    }

    let repo = GroupRepository::new(state.db.pool().clone());
    let group = repo.create(&req).await?;

    info!(id = %group.id, name = %group.name, code = %group.code, "Created study group");

    Ok((StatusCode::CREATED, Json(group)))
}

/// Update a study group
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());
    let group = repo.update(id, &req).await?;

    match group {
        Some(g) => {
            info!(id = %g.id, name = %g.name, "Updated study group");
            Ok(Json(g))
        }
        None => Err(ScholarsError::NotFound(format!(
            "Group with id {} not found",
            id
        ))),
    }
}

/// Delete a study group
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());
    let deleted = repo.delete(id).await?;

    if deleted {
        info!(id = %id, "Deleted study group");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ScholarsError::NotFound(format!(
            "Group with id {} not found",
            id
        )))
    }
}

/// List the members of a group
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());

    if repo.get_by_id(id).await?.is_none() {
        return Err(ScholarsError::NotFound(format!(
            "Group with id {} not found",
            id
        )));
    }

    let members = repo.list_members(id).await?;
    Ok(Json(members))
}

/// Add a member to a group
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());

    let group = repo.get_by_id(id).await?.ok_or_else(|| {
        ScholarsError::NotFound(format!("Group with id {} not found", id))
    })?;

    let members = repo.list_members(id).await?;
    let already_member = members.iter().any(|m| m.user_id == req.user_id);
    if !already_member && members.len() as i32 >= group.max_members {
        return Err(ScholarsError::InvalidRequest(format!(
            "Group {} is full ({} members)",
            id, group.max_members
        )));
    }

    let member = repo.add_member(id, req.user_id).await?;

    info!(group_id = %id, user_id = %req.user_id, "Added group member");

    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a member from a group
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ScholarsError> {
    let repo = GroupRepository::new(state.db.pool().clone());
    let removed = repo.remove_member(id, user_id).await?;

    if removed {
        info!(group_id = %id, user_id = %user_id, "Removed group member");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ScholarsError::NotFound(format!(
            "User {} is not a member of group {}",
            user_id, id
        )))
    }
}
