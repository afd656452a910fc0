//! Room repository.
//!
//! Rooms are immutable reference data, so the full listing sits behind a
//! short-lived moka cache shared via `AppState`. Lookups by ID skip the
//! cache - the booking workflow re-resolves rooms fresh.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use harborview_core::RoomId;

use super::{RepositoryError, bounded};
use crate::models::Room;

/// Cache of the full room listing, keyed by a single sentinel entry.
pub type RoomCache = Cache<&'static str, Arc<Vec<Room>>>;

const ROOMS_KEY: &str = "all_rooms";
const ROOMS_TTL: Duration = Duration::from_secs(60);

/// Build the room-listing cache.
#[must_use]
pub fn new_room_cache() -> RoomCache {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(ROOMS_TTL)
        .build()
}

/// Repository for room reference data.
pub struct RoomRepository<'a> {
    pool: &'a PgPool,
    cache: &'a RoomCache,
}

impl<'a> RoomRepository<'a> {
    /// Create a new room repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a RoomCache) -> Self {
        Self { pool, cache }
    }

    /// All rooms, ordered by name. Served from the cache when warm.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or
    /// `RepositoryError::Timeout` if it exceeds the store bound.
    pub async fn all(&self) -> Result<Arc<Vec<Room>>, RepositoryError> {
        if let Some(rooms) = self.cache.get(&ROOMS_KEY).await {
            return Ok(rooms);
        }

        let rooms: Vec<Room> = bounded(async {
            sqlx::query_as(
                r"
                SELECT id, room_name, description, created_at, updated_at
                FROM rooms
                ORDER BY room_name ASC
                ",
            )
            .fetch_all(self.pool)
            .await
            .map_err(RepositoryError::from)
        })
        .await?;

        let rooms = Arc::new(rooms);
        self.cache.insert(ROOMS_KEY, Arc::clone(&rooms)).await;
        Ok(rooms)
    }

    /// Fetch one room by ID. `None` for a stale or invalid ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or
    /// `RepositoryError::Timeout` if it exceeds the store bound.
    pub async fn get(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        bounded(async {
            sqlx::query_as(
                r"
                SELECT id, room_name, description, created_at, updated_at
                FROM rooms
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
