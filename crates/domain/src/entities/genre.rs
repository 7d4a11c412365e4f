use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named tag attached to movies. Names are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Genre {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Name is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}
