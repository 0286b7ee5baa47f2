//! Student repository for student record database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use academe_shared::types::{StudentId, pagination::PageRequest};

use crate::entities::{enrollments, students};

/// Error types for student operations.
#[derive(Debug, thiserror::Error)]
pub enum StudentError {
    /// Student not found.
    #[error("Student not found: {0}")]
    NotFound(Uuid),

    /// Students with enrollments cannot be deleted.
    #[error("Student {0} has enrollments on record")]
    HasEnrollments(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a student record.
#[derive(Debug, Clone)]
pub struct CreateStudentInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Home address.
    pub address: Option<String>,
    /// School the student graduated from.
    pub school_of_origin: Option<String>,
}

/// Input for updating a student record. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentInput {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Middle name. `Some(None)` clears it.
    pub middle_name: Option<Option<String>>,
    /// Contact email. `Some(None)` clears it.
    pub email: Option<Option<String>>,
    /// Contact phone. `Some(None)` clears it.
    pub phone: Option<Option<String>>,
    /// Home address. `Some(None)` clears it.
    pub address: Option<Option<String>>,
    /// School of origin. `Some(None)` clears it.
    pub school_of_origin: Option<Option<String>>,
}

/// Student repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: DatabaseConnection,
}

impl StudentRepository {
    /// Creates a new student repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a student record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_student(
        &self,
        input: CreateStudentInput,
    ) -> Result<students::Model, StudentError> {
        let now = Utc::now().into();
        let student = students::ActiveModel {
            id: Set(StudentId::new().into_inner()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            middle_name: Set(input.middle_name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            school_of_origin: Set(input.school_of_origin),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(student)
    }

    /// Gets a student by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not found or the query fails.
    pub async fn get_student(&self, student_id: Uuid) -> Result<students::Model, StudentError> {
        students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::NotFound(student_id))
    }

    /// Lists students, optionally matching a name search, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_students(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<students::Model>, u64), StudentError> {
        let mut query = students::Entity::find();

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(students::Column::FirstName.like(pattern.clone()))
                    .add(students::Column::LastName.like(pattern)),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let students = query
            .order_by_asc(students::Column::LastName)
            .order_by_asc(students::Column::FirstName)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((students, total))
    }

    /// Updates a student record.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not found or the update fails.
    pub async fn update_student(
        &self,
        student_id: Uuid,
        input: UpdateStudentInput,
    ) -> Result<students::Model, StudentError> {
        let student = students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::NotFound(student_id))?;

        let mut active: students::ActiveModel = student.into();
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(middle_name) = input.middle_name {
            active.middle_name = Set(middle_name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(school_of_origin) = input.school_of_origin {
            active.school_of_origin = Set(school_of_origin);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a student with no enrollments on record.
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not found or has enrollments.
    pub async fn delete_student(&self, student_id: Uuid) -> Result<(), StudentError> {
        students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(StudentError::NotFound(student_id))?;

        let enrollment_count = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .count(&self.db)
            .await?;

        if enrollment_count > 0 {
            return Err(StudentError::HasEnrollments(student_id));
        }

        students::Entity::delete_by_id(student_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
