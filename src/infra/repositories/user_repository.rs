//! User repository - typed query half of the data-store gateway.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUserRecord, User, UserResponse};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user and return its public projection.
    ///
    /// A unique-index violation on `email` is reported as
    /// [`AppError::DuplicateEmail`].
    async fn insert(&self, record: NewUserRecord) -> AppResult<UserResponse>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn insert(&self, record: NewUserRecord) -> AppResult<UserResponse> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(record.name),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            role: Set(record.role.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(map_insert_error)?;

        // The hash is dropped here; only the projection leaves the gateway
        User::try_from(model).map(UserResponse::from)
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    classify_insert_error(err.sql_err(), err)
}

/// `idx_users_email` is the only unique index a user insert can hit.
fn classify_insert_error(sql_err: Option<SqlErr>, err: DbErr) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
        _ => AppError::Database(err),
    }
}
