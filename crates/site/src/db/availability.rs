//! Availability checker.
//!
//! Both queries use the half-open overlap test: a stored restriction
//! `[s, e)` conflicts with a queried stay `[start, end)` iff
//! `start < e AND end > s`. Degenerate ranges never reach this module -
//! `StayRange` rejects them at construction.

use sqlx::PgPool;

use harborview_core::{RoomId, StayRange};

use super::{RepositoryError, bounded};
use crate::models::Room;

/// Repository for date-range availability queries.
pub struct AvailabilityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AvailabilityRepository<'a> {
    /// Create a new availability repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// True iff no restriction for `room_id` overlaps the stay.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or
    /// `RepositoryError::Timeout` if it exceeds the store bound; store
    /// failures are propagated, never swallowed.
    pub async fn is_room_available(
        &self,
        room_id: RoomId,
        stay: &StayRange,
    ) -> Result<bool, RepositoryError> {
        let overlapping: i64 = bounded(async {
            sqlx::query_scalar(
                r"
                SELECT count(id)
                FROM room_restrictions
                WHERE room_id = $1 AND $2 < end_date AND $3 > start_date
                ",
            )
            .bind(room_id)
            .bind(stay.start())
            .bind(stay.end())
            .fetch_one(self.pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await?;

        Ok(overlapping == 0)
    }

    /// All rooms with zero overlapping restrictions for the stay.
    /// An empty vec, not an error, when nothing is free.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or
    /// `RepositoryError::Timeout` if it exceeds the store bound.
    pub async fn find_available_rooms(
        &self,
        stay: &StayRange,
    ) -> Result<Vec<Room>, RepositoryError> {
        bounded(async {
            sqlx::query_as(
                r"
                SELECT r.id, r.room_name, r.description, r.created_at, r.updated_at
                FROM rooms r
                WHERE r.id NOT IN (
                    SELECT rr.room_id
                    FROM room_restrictions rr
                    WHERE $1 < rr.end_date AND $2 > rr.start_date
                )
                ORDER BY r.room_name ASC
                ",
            )
            .bind(stay.start())
            .bind(stay.end())
            .fetch_all(self.pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await
    }
}
