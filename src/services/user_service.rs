//! User service - the user-creation workflow.
//!
//! One invocation performs, strictly in order: an email lookup, password
//! hashing, and a single insert. Nothing is retried; every failure goes
//! straight back to the caller.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewUser, NewUserRecord, Password, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user and return its public projection
    async fn create_user(&self, input: NewUser) -> AppResult<UserResponse>;
}

/// Concrete implementation of UserService over a repository.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    #[tracing::instrument(skip_all, fields(role = %input.role))]
    async fn create_user(&self, input: NewUser) -> AppResult<UserResponse> {
        let NewUser {
            name,
            email,
            password,
            role,
        } = input;

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::warn!("Registration rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        // Argon2 is CPU-bound; keep it off the async workers
        let password_hash = tokio::task::spawn_blocking(move || Password::new(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??
            .into_string();

        let user = self
            .users
            .insert(NewUserRecord {
                name,
                email,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}
