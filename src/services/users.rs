//! User registration, authentication and account management

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{Credentials, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new account. A taken username is a conflict and the
    /// existing record keeps its password.
    pub async fn register(&self, credentials: &Credentials) -> AppResult<User> {
        self.create(credentials, "Username already taken.").await
    }

    /// Create an account on someone else's behalf
    pub async fn add(&self, credentials: &Credentials) -> AppResult<User> {
        self.create(credentials, "Username already exists.").await
    }

    async fn create(&self, credentials: &Credentials, taken: &str) -> AppResult<User> {
        credentials.validate()?;
        let hash = self.hash_password(&credentials.password)?;

        let user = self
            .repository
            .users
            .insert(&credentials.username, &hash)
            .await?
            .ok_or_else(|| AppError::Conflict(taken.to_string()))?;

        tracing::info!("Created user {}", user.username);
        Ok(user)
    }

    /// Authenticate by username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .repository
            .users
            .get(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!("Failed login for {}", username);
            return Err(AppError::Authentication("Invalid password.".to_string()));
        }

        tracing::info!("User {} logged in", username);
        Ok(user)
    }

    /// Replace the password of any user
    pub async fn update(&self, username: &str, new_password: &str) -> AppResult<()> {
        Credentials::new(username, new_password).validate()?;
        let hash = self.hash_password(new_password)?;

        if !self.repository.users.update_password(username, &hash).await? {
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        tracing::info!("Updated password of {}", username);
        Ok(())
    }

    /// Change the signed-in user's own password
    pub async fn change_password(&self, user: &User, new_password: &str) -> AppResult<()> {
        self.update(&user.username, new_password).await
    }

    pub async fn delete(&self, username: &str) -> AppResult<()> {
        if !self.repository.users.delete(username).await? {
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        tracing::info!("Deleted user {}", username);
        Ok(())
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// End a console session. There is no server-side session to revoke.
    pub fn logout(&self, user: &User) {
        tracing::info!("User {} logged out", user.username);
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
