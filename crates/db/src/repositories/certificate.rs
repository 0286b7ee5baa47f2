//! Certificate repository for good moral certificate issuance.

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use academe_core::certificates::CertificateSerial;
use academe_shared::types::CertificateId;

use crate::entities::{good_moral_certificates, students};

/// Error types for certificate operations.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    /// Certificate not found.
    #[error("Certificate not found: {0}")]
    NotFound(String),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Serial allocation raced with a concurrent issuance.
    #[error("Concurrent certificate issuance, please retry")]
    SerialConflict,

    /// Stored serial failed to parse; data corruption.
    #[error("Corrupt certificate serial in store: {0}")]
    CorruptSerial(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for issuing a good moral certificate.
#[derive(Debug, Clone)]
pub struct IssueCertificateInput {
    /// Student the certificate is issued for.
    pub student_id: Uuid,
    /// Stated purpose (e.g. "board examination application").
    pub purpose: String,
    /// Staff member issuing.
    pub issued_by: Uuid,
}

/// Certificate repository.
#[derive(Debug, Clone)]
pub struct CertificateRepository {
    db: DatabaseConnection,
}

impl CertificateRepository {
    /// Creates a new certificate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a certificate with the next serial of the current year.
    ///
    /// The serial sequence is allocated inside a transaction; the unique
    /// `(serial_year, serial_sequence)` index turns a lost race into a
    /// `SerialConflict` the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the student does not exist, the serial race is
    /// lost, or the insert fails.
    pub async fn issue_certificate(
        &self,
        input: IssueCertificateInput,
    ) -> Result<good_moral_certificates::Model, CertificateError> {
        students::Entity::find_by_id(input.student_id)
            .one(&self.db)
            .await?
            .ok_or(CertificateError::StudentNotFound(input.student_id))?;

        let txn = self.db.begin().await?;
        let year = Utc::now().year();

        let last = good_moral_certificates::Entity::find()
            .filter(good_moral_certificates::Column::SerialYear.eq(year))
            .order_by_desc(good_moral_certificates::Column::SerialSequence)
            .limit(1)
            .one(&txn)
            .await?;

        #[allow(clippy::cast_sign_loss)]
        let serial = match last {
            Some(cert) => CertificateSerial::new(year, cert.serial_sequence as u32 + 1),
            None => CertificateSerial::new(year, 1),
        }
        .map_err(|e| CertificateError::CorruptSerial(e.to_string()))?;

        let now = Utc::now().into();
        #[allow(clippy::cast_possible_wrap)]
        let result = good_moral_certificates::ActiveModel {
            id: Set(CertificateId::new().into_inner()),
            student_id: Set(input.student_id),
            serial: Set(serial.to_string()),
            serial_year: Set(serial.year()),
            serial_sequence: Set(serial.sequence() as i32),
            purpose: Set(input.purpose),
            issued_by: Set(input.issued_by),
            issued_at: Set(now),
            created_at: Set(now),
        }
        .insert(&txn)
        .await;

        let certificate = match result {
            Ok(cert) => cert,
            // Unique violation on (serial_year, serial_sequence): another
            // issuance won the sequence.
            Err(e) if is_unique_violation(&e) => return Err(CertificateError::SerialConflict),
            Err(e) => return Err(e.into()),
        };

        txn.commit().await?;
        Ok(certificate)
    }

    /// Finds a certificate by its serial string.
    ///
    /// # Errors
    ///
    /// Returns an error if no certificate carries the serial.
    pub async fn find_by_serial(
        &self,
        serial: &str,
    ) -> Result<good_moral_certificates::Model, CertificateError> {
        good_moral_certificates::Entity::find()
            .filter(good_moral_certificates::Column::Serial.eq(serial))
            .one(&self.db)
            .await?
            .ok_or_else(|| CertificateError::NotFound(serial.to_string()))
    }

    /// Lists certificates, newest first, optionally for one student.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_certificates(
        &self,
        student_id: Option<Uuid>,
    ) -> Result<Vec<good_moral_certificates::Model>, CertificateError> {
        let mut query = good_moral_certificates::Entity::find();
        if let Some(student_id) = student_id {
            query = query.filter(good_moral_certificates::Column::StudentId.eq(student_id));
        }

        let certificates = query
            .order_by_desc(good_moral_certificates::Column::IssuedAt)
            .all(&self.db)
            .await?;

        Ok(certificates)
    }
}

/// Best-effort detection of a Postgres unique violation through the `DbErr`
/// surface.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err, DbErr::Query(_) | DbErr::Exec(_)) && err.to_string().contains("duplicate key")
}
