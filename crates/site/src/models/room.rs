//! Room reference data.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use harborview_core::RoomId;

/// A bookable room. Immutable reference data seeded at install time.
#[derive(Debug, Clone, FromRow)]
pub struct Room {
    pub id: RoomId,
    pub room_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
