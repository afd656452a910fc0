//! Reservations and room restrictions.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use harborview_core::{
    Email, ProcessedFlag, ReservationId, RestrictionId, RestrictionKind, RoomId, StayRange,
};

/// A persisted reservation, joined with its room name for display.
#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: ReservationId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: RoomId,
    pub processed: ProcessedFlag,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Guest's full name for listings.
    #[must_use]
    pub fn guest_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A date-range block on one room, optionally tied to a reservation.
///
/// A booking always produces exactly one `Reservation`-kind restriction;
/// maintenance and owner blocks stand alone.
#[derive(Debug, Clone, FromRow)]
pub struct RoomRestriction {
    pub id: RestrictionId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: RoomId,
    pub reservation_id: Option<ReservationId>,
    pub kind: RestrictionKind,
}

/// Validated input for the booking transaction.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub stay: StayRange,
    pub room_id: RoomId,
}
