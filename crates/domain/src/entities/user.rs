use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core user entity. The password hash stays inside the backend; handlers
/// expose a projection without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>, // None for new users before persistence
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            username,
            email,
            password_hash,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.username.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        if self.email.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }

        if !self.email.contains('@') {
            return Err(crate::DomainError::ValidationError(
                "Invalid email format".to_string(),
            ));
        }

        Ok(())
    }
}
