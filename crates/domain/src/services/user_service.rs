use crate::entities::User;
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

// Matches the salt rounds the catalog has always used.
const HASH_COST: u32 = 10;

/// Partial profile change; empty/absent fields keep their current value.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration, login and profile workflows.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Register a new account. Emails are unique across all users.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, DomainError> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::ValidationError(
                "Please fill all the fields".to_string(),
            ));
        }

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password).await?;
        let user = User::new(username, email, password_hash);
        user.validate()?;

        self.user_repository.save(&user).await
    }

    /// Verify credentials and return the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User not found".to_string()))?;

        let valid = verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            return Err(DomainError::Unauthorized("Invalid password".to_string()));
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        match self.user_repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::NotFound(format!("User not found: {}", id))),
        }
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.user_repository.find_all().await
    }

    /// Apply a partial profile change; password changes are re-hashed.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.get_user(id).await?;

        if let Some(username) = update.username {
            if !username.trim().is_empty() {
                user.username = username;
            }
        }

        if let Some(email) = update.email {
            if !email.trim().is_empty() && email != user.email {
                if let Some(existing) = self.user_repository.find_by_email(&email).await? {
                    if existing.id != user.id {
                        return Err(DomainError::Conflict(
                            "Email already in use".to_string(),
                        ));
                    }
                }
                user.email = email;
            }
        }

        if let Some(password) = update.password {
            if !password.is_empty() {
                user.password_hash = hash_password(password).await?;
            }
        }

        user.validate()?;
        user.updated_at = Utc::now();
        self.user_repository.update(&user).await
    }

    /// Create the bootstrap admin account if it does not exist yet.
    pub async fn ensure_admin(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<User, DomainError> {
        if let Some(existing) = self.user_repository.find_by_email(&email).await? {
            return Ok(existing);
        }

        let password_hash = hash_password(password).await?;
        let mut user = User::new(username, email, password_hash);
        user.is_admin = true;
        user.validate()?;

        self.user_repository.save(&user).await
    }
}

// bcrypt is CPU-bound; keep it off the request-dispatch threads.
async fn hash_password(password: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .map_err(|e| DomainError::RepositoryError(format!("hashing task failed: {}", e)))?
        .map_err(|e| DomainError::RepositoryError(format!("password hashing failed: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, DomainError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| DomainError::RepositoryError(format!("hashing task failed: {}", e)))?
        .map_err(|e| DomainError::RepositoryError(format!("password verification failed: {}", e)))
}
