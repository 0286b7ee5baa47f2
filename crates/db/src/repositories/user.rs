//! User repository for staff account database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use academe_shared::types::UserId;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email already registered.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a staff account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email.
    pub email: String,
    /// Argon2id password hash (already hashed by the caller).
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Staff role.
    pub role: UserRole,
}

/// User repository for staff account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a staff account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the insert fails.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(input.email.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(user)
    }

    /// Finds a user by login email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user)
    }

    /// Lists all staff accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_users(&self) -> Result<Vec<users::Model>, UserError> {
        let users = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// Activates or deactivates a staff account.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the update fails.
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<users::Model, UserError> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
