//! Database operations for the Harborview `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `rooms` - Immutable room reference data (seeded via `hv-cli seed`)
//! - `reservations` - Guest reservations with the 0/1 `processed` flag
//! - `room_restrictions` - Date-range blocks, optionally tied to a
//!   reservation, guarded by a `btree_gist` exclusion constraint
//! - `users` - Admin accounts
//! - `tower_sessions.session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p harborview-cli -- migrate
//! ```
//!
//! Every store call is bounded by [`STORE_TIMEOUT`]; a query that exceeds it
//! surfaces as [`RepositoryError::Timeout`], a recoverable error, never a
//! crash.

pub mod availability;
pub mod reservations;
pub mod rooms;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use availability::AvailabilityRepository;
pub use reservations::ReservationRepository;
pub use rooms::{RoomCache, RoomRepository, new_room_cache};
pub use users::UserRepository;

/// Upper bound on any single store operation.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A store call exceeded [`STORE_TIMEOUT`].
    #[error("database operation timed out")]
    Timeout,

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint, exclusion, or serialization failure. For bookings this
    /// means a concurrent writer got there first.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run a store operation under [`STORE_TIMEOUT`].
pub(crate) async fn bounded<T, F>(fut: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(STORE_TIMEOUT, fut)
        .await
        .map_err(|_| RepositoryError::Timeout)?
}

/// Map a sqlx error, turning write-race failures into `Conflict`.
///
/// SQLSTATE 23505 (unique violation), 23P01 (exclusion violation), and
/// 40001 (serialization failure) all mean a concurrent writer won.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && let Some(code) = db_err.code()
        && matches!(code.as_ref(), "23505" | "23P01" | "40001")
    {
        return RepositoryError::Conflict(db_err.message().to_owned());
    }
    RepositoryError::Database(e)
}
