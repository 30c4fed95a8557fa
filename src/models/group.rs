use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Length of generated group join codes
pub const JOIN_CODE_LEN: usize = 8;

/// Study group entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyGroup {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub code: String,
    pub created_by: Option<Uuid>,
    pub max_members: i32,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group membership row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Request body for creating a study group
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub created_by: Option<Uuid>,
    pub max_members: Option<i32>,
    pub is_private: Option<bool>,
}

/// Request body for updating a study group
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub max_members: Option<i32>,
    pub is_private: Option<bool>,
}

/// Request body for adding a member to a group
#[derive(Debug, Clone, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Generate a random alphanumeric join code
pub fn generate_join_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(JOIN_CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_code_shape() {
        let code = generate_join_code();
        assert_eq!(code.len(), JOIN_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_join_codes_vary() {
        let a = generate_join_code();
        let b = generate_join_code();
        // 36^8 code space; two consecutive draws colliding means the RNG is broken
        assert_ne!(a, b);
    }
}
