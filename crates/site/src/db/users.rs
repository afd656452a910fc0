//! Admin user repository.

use sqlx::PgPool;

use harborview_core::{Email, UserId};

use super::{RepositoryError, bounded};
use crate::models::AdminUser;

/// Repository for admin account lookups.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an admin account by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        bounded(async {
            sqlx::query_as(
                r"
                SELECT id, first_name, last_name, email, password_hash,
                       access_level, created_at, updated_at
                FROM users
                WHERE email = $1
                ",
            )
            .bind(email)
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await
    }

    /// Look up an admin account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<AdminUser>, RepositoryError> {
        bounded(async {
            sqlx::query_as(
                r"
                SELECT id, first_name, last_name, email, password_hash,
                       access_level, created_at, updated_at
                FROM users
                WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await
    }
}
