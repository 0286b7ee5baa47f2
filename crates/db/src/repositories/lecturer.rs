//! Lecturer repository for lecturer catalog operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use academe_shared::types::LecturerId;

use crate::entities::lecturers;

/// Error types for lecturer operations.
#[derive(Debug, thiserror::Error)]
pub enum LecturerError {
    /// Lecturer not found.
    #[error("Lecturer not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a lecturer.
#[derive(Debug, Clone)]
pub struct CreateLecturerInput {
    /// Full name.
    pub full_name: String,
    /// Subject specialization.
    pub specialization: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Input for updating a lecturer. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLecturerInput {
    /// Full name.
    pub full_name: Option<String>,
    /// Subject specialization. `Some(None)` clears it.
    pub specialization: Option<Option<String>>,
    /// Contact email. `Some(None)` clears it.
    pub email: Option<Option<String>>,
    /// Contact phone. `Some(None)` clears it.
    pub phone: Option<Option<String>>,
    /// Whether the lecturer is active.
    pub is_active: Option<bool>,
}

/// Lecturer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct LecturerRepository {
    db: DatabaseConnection,
}

impl LecturerRepository {
    /// Creates a new lecturer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a lecturer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_lecturer(
        &self,
        input: CreateLecturerInput,
    ) -> Result<lecturers::Model, LecturerError> {
        let now = Utc::now().into();
        let lecturer = lecturers::ActiveModel {
            id: Set(LecturerId::new().into_inner()),
            full_name: Set(input.full_name),
            specialization: Set(input.specialization),
            email: Set(input.email),
            phone: Set(input.phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(lecturer)
    }

    /// Gets a lecturer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the lecturer is not found or the query fails.
    pub async fn get_lecturer(&self, lecturer_id: Uuid) -> Result<lecturers::Model, LecturerError> {
        lecturers::Entity::find_by_id(lecturer_id)
            .one(&self.db)
            .await?
            .ok_or(LecturerError::NotFound(lecturer_id))
    }

    /// Lists lecturers, optionally only active ones, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_lecturers(
        &self,
        only_active: bool,
    ) -> Result<Vec<lecturers::Model>, LecturerError> {
        let mut query = lecturers::Entity::find();
        if only_active {
            query = query.filter(lecturers::Column::IsActive.eq(true));
        }

        let lecturers = query
            .order_by_asc(lecturers::Column::FullName)
            .all(&self.db)
            .await?;
        Ok(lecturers)
    }

    /// Updates a lecturer.
    ///
    /// # Errors
    ///
    /// Returns an error if the lecturer is not found or the update fails.
    pub async fn update_lecturer(
        &self,
        lecturer_id: Uuid,
        input: UpdateLecturerInput,
    ) -> Result<lecturers::Model, LecturerError> {
        let lecturer = lecturers::Entity::find_by_id(lecturer_id)
            .one(&self.db)
            .await?
            .ok_or(LecturerError::NotFound(lecturer_id))?;

        let mut active: lecturers::ActiveModel = lecturer.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(specialization) = input.specialization {
            active.specialization = Set(specialization);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }
}
