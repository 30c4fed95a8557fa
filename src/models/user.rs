use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User presence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Offline,
    Online,
    Away,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Offline => "offline",
            UserStatus::Online => "online",
            UserStatus::Away => "away",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "offline" => Some(UserStatus::Offline),
            "online" => Some(UserStatus::Online),
            "away" => Some(UserStatus::Away),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub avatar: String,
    pub status: String, // Stored as string in DB
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

/// Request body for updating a user
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_round_trip() {
        for status in [UserStatus::Offline, UserStatus::Online, UserStatus::Away] {
            assert_eq!(UserStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::from_str("ONLINE"), Some(UserStatus::Online));
        assert_eq!(UserStatus::from_str("busy"), None);
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
            avatar: "default-avatar.png".to_string(),
            status: "offline".to_string(),
            last_active: Utc::now(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "ada");
    }
}
