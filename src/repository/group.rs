use crate::error::Result;
use crate::models::{
    generate_join_code, CreateGroupRequest, GroupMember, StudyGroup, UpdateGroupRequest,
};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for study group database operations
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a group by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<StudyGroup>> {
        let group = sqlx::query_as::<_, StudyGroup>(
            r#"
            SELECT id, name, description, subject, code, created_by,
                   max_members, is_private, created_at, updated_at
            FROM study_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Get a group by its join code
    pub async fn get_by_code(&self, code: &str) -> Result<Option<StudyGroup>> {
        let group = sqlx::query_as::<_, StudyGroup>(
            r#"
            SELECT id, name, description, subject, code, created_by,
                   max_members, is_private, created_at, updated_at
            FROM study_groups
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Get all groups
    pub async fn get_all(&self) -> Result<Vec<StudyGroup>> {
        let groups = sqlx::query_as::<_, StudyGroup>(
            r#"
            SELECT id, name, description, subject, code, created_by,
                   max_members, is_private, created_at, updated_at
            FROM study_groups
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Create a new group with a fresh join code
    pub async fn create(&self, req: &CreateGroupRequest) -> Result<StudyGroup> {
        let group = sqlx::query_as::<_, StudyGroup>(
            r#"
            INSERT INTO study_groups
                (id, name, description, subject, code, created_by,
                 max_members, is_private, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING id, name, description, subject, code, created_by,
                      max_members, is_private, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(req.description.as_deref().unwrap_or(""))
        .bind(req.subject.as_deref().unwrap_or(""))
        .bind(generate_join_code())
        .bind(req.created_by)
        .bind(req.max_members.unwrap_or(10))
        .bind(req.is_private.unwrap_or(false))
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Update a group; returns None if it does not exist
    pub async fn update(&self, id: Uuid, req: &UpdateGroupRequest) -> Result<Option<StudyGroup>> {
        let group = sqlx::query_as::<_, StudyGroup>(
            r#"
            UPDATE study_groups
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                subject = COALESCE($4, subject),
                max_members = COALESCE($5, max_members),
                is_private = COALESCE($6, is_private),
                updated_at = $7
            WHERE id = $1
            RETURNING id, name, description, subject, code, created_by,
                      max_members, is_private, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.name.as_deref())
        .bind(req.description.as_deref())
        .bind(req.subject.as_deref())
        .bind(req.max_members)
        .bind(req.is_private)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Delete a group; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM study_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a member to a group; idempotent on repeat joins
    pub async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<GroupMember> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (group_id, user_id, joined_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (group_id, user_id) DO UPDATE SET group_id = EXCLUDED.group_id
            RETURNING group_id, user_id, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Remove a member from a group; returns whether a row was removed
    pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
                .bind(group_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List the members of a group
    pub async fn list_members(&self, group_id: Uuid) -> Result<Vec<GroupMember>> {
        let members = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT group_id, user_id, joined_at
            FROM group_members
            WHERE group_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
