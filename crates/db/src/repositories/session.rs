//! Session repository for refresh token management.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use academe_shared::types::SessionId;

use crate::entities::sessions;

/// Error types for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No active session matches the presented token.
    #[error("Session not found or revoked")]
    NotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Hashes a refresh token for storage; tokens are never stored in the clear.
#[must_use]
pub fn hash_refresh_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Session repository for refresh token sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a session for a freshly issued refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> Result<sessions::Model, SessionError> {
        let now = Utc::now().into();
        let session = sessions::ActiveModel {
            id: Set(SessionId::new().into_inner()),
            user_id: Set(user_id),
            refresh_token_hash: Set(hash_refresh_token(refresh_token)),
            user_agent: Set(user_agent),
            ip_address: Set(ip_address),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(session)
    }

    /// Finds the active, unexpired session for a presented refresh token.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no live session matches.
    pub async fn find_active(&self, refresh_token: &str) -> Result<sessions::Model, SessionError> {
        let now: DateTime<Utc> = Utc::now();
        sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(hash_refresh_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Revokes the session for a presented refresh token.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no live session matches.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), SessionError> {
        let session = self.find_active(refresh_token).await?;

        let mut active: sessions::ActiveModel = session.into();
        active.revoked_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Revokes every live session of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, SessionError> {
        let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, sea_orm::sea_query::Expr::value(now))
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_hex() {
        let a = hash_refresh_token("token-one");
        let b = hash_refresh_token("token-one");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_tokens_different_hashes() {
        assert_ne!(hash_refresh_token("token-one"), hash_refresh_token("token-two"));
    }
}
