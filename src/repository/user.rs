use crate::error::Result;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, avatar, status, last_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get all users
    pub async fn get_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, avatar, status, last_active, created_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Create a new user
    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password, avatar, status, last_active, created_at)
            VALUES ($1, $2, $3, $4, $5, 'offline', NOW(), NOW())
            RETURNING id, username, email, password, avatar, status, last_active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.password)
        .bind(req.avatar.as_deref().unwrap_or("default-avatar.png"))
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update a user; returns None if it does not exist
    pub async fn update(&self, id: Uuid, req: &UpdateUserRequest) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                avatar = COALESCE($4, avatar),
                status = COALESCE($5, status),
                last_active = $6
            WHERE id = $1
            RETURNING id, username, email, password, avatar, status, last_active, created_at
            "#,
        )
        .bind(id)
        .bind(req.username.as_deref())
        .bind(req.email.as_deref())
        .bind(req.avatar.as_deref())
        .bind(req.status.as_deref())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
