//! Reservation repository.
//!
//! The booking write path runs as one SERIALIZABLE transaction: availability
//! re-check, reservation insert, restriction insert. A concurrent booking
//! for the same room and dates loses either at the re-check, at the
//! exclusion constraint, or at commit - all surfaced as
//! [`RepositoryError::Conflict`] so the caller can send the guest back to
//! search. The reservation row is never left without its restriction.

use chrono::NaiveDate;
use sqlx::PgPool;

use harborview_core::{Email, ProcessedFlag, ReservationId, RestrictionKind};

use super::{RepositoryError, bounded, map_write_error};
use crate::models::{NewReservation, Reservation, RoomRestriction};

const RESERVATION_COLUMNS: &str = r"
    SELECT r.id, r.first_name, r.last_name, r.email, r.phone,
           r.start_date, r.end_date, r.room_id, r.processed,
           rm.room_name, r.created_at, r.updated_at
    FROM reservations r
    LEFT JOIN rooms rm ON r.room_id = rm.id
";

/// Repository for reservation reads and writes.
pub struct ReservationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReservationRepository<'a> {
    /// Create a new reservation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a reservation and its date-range restriction as one unit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when a concurrent booking won the
    /// room (re-check, exclusion constraint, or serialization failure);
    /// everything written so far is rolled back. Returns
    /// `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn book(&self, new: &NewReservation) -> Result<ReservationId, RepositoryError> {
        bounded(async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
                .execute(&mut *tx)
                .await?;

            // Re-check availability inside the transaction: the guest's
            // earlier search result may be stale by now.
            let overlapping: i64 = sqlx::query_scalar(
                r"
                SELECT count(id)
                FROM room_restrictions
                WHERE room_id = $1 AND $2 < end_date AND $3 > start_date
                ",
            )
            .bind(new.room_id)
            .bind(new.stay.start())
            .bind(new.stay.end())
            .fetch_one(&mut *tx)
            .await?;

            if overlapping > 0 {
                tx.rollback().await?;
                return Err(RepositoryError::Conflict(
                    "room is no longer available for those dates".to_owned(),
                ));
            }

            let reservation_id: ReservationId = sqlx::query_scalar(
                r"
                INSERT INTO reservations
                    (first_name, last_name, email, phone, start_date, end_date, room_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                ",
            )
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(new.stay.start())
            .bind(new.stay.end())
            .bind(new.room_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_write_error)?;

            sqlx::query(
                r"
                INSERT INTO room_restrictions
                    (start_date, end_date, room_id, reservation_id, kind)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(new.stay.start())
            .bind(new.stay.end())
            .bind(new.room_id)
            .bind(reservation_id)
            .bind(RestrictionKind::Reservation)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

            tx.commit().await.map_err(map_write_error)?;

            Ok(reservation_id)
        })
        .await
    }

    /// All reservations, earliest stay first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn all(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let query = format!("{RESERVATION_COLUMNS} ORDER BY r.start_date ASC");
        bounded(async {
            sqlx::query_as(&query)
                .fetch_all(self.pool)
                .await
                .map_err(RepositoryError::from)
        })
        .await
    }

    /// Unprocessed reservations awaiting admin review, earliest stay first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn all_new(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let query = format!("{RESERVATION_COLUMNS} WHERE r.processed = 0 ORDER BY r.start_date ASC");
        bounded(async {
            sqlx::query_as(&query)
                .fetch_all(self.pool)
                .await
                .map_err(RepositoryError::from)
        })
        .await
    }

    /// Fetch one reservation by ID for the admin detail view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let query = format!("{RESERVATION_COLUMNS} WHERE r.id = $1");
        bounded(async {
            sqlx::query_as(&query)
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(RepositoryError::from)
        })
        .await
    }

    /// Update the guest contact fields of a reservation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reservation doesn't exist;
    /// `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn update_guest(
        &self,
        id: ReservationId,
        first_name: &str,
        last_name: &str,
        email: &Email,
        phone: &str,
    ) -> Result<(), RepositoryError> {
        bounded(async {
            let result = sqlx::query(
                r"
                UPDATE reservations
                SET first_name = $1, last_name = $2, email = $3, phone = $4, updated_at = now()
                WHERE id = $5
                ",
            )
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(phone)
            .bind(id)
            .execute(self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    /// Set the admin processed marker (0/1) on a reservation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reservation doesn't exist;
    /// `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn set_processed(
        &self,
        id: ReservationId,
        processed: ProcessedFlag,
    ) -> Result<(), RepositoryError> {
        bounded(async {
            let result = sqlx::query(
                r"
                UPDATE reservations
                SET processed = $1, updated_at = now()
                WHERE id = $2
                ",
            )
            .bind(processed)
            .bind(id)
            .execute(self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    /// Hard-delete a reservation. Its restriction rows cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the reservation doesn't exist;
    /// `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn delete(&self, id: ReservationId) -> Result<(), RepositoryError> {
        bounded(async {
            let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }

    /// All restrictions overlapping `[start, end)`, for the admin calendar.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database`/`Timeout` on store failure.
    pub async fn restrictions_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RoomRestriction>, RepositoryError> {
        bounded(async {
            sqlx::query_as(
                r"
                SELECT id, start_date, end_date, room_id, reservation_id, kind
                FROM room_restrictions
                WHERE $1 < end_date AND $2 > start_date
                ORDER BY room_id ASC, start_date ASC
                ",
            )
            .bind(start)
            .bind(end)
            .fetch_all(self.pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await
    }
}
