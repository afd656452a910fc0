//! Application state shared across handlers.
//!
//! Store and session handles are passed into workflow calls explicitly -
//! there are no module-level singletons.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::db::{
    AvailabilityRepository, ReservationRepository, RoomCache, RoomRepository, UserRepository,
    new_room_cache,
};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; hands out per-request repository handles
/// over the shared pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    room_cache: RoomCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                room_cache: new_room_cache(),
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Room reference-data repository (cached listing).
    #[must_use]
    pub fn rooms(&self) -> RoomRepository<'_> {
        RoomRepository::new(&self.inner.pool, &self.inner.room_cache)
    }

    /// Availability checker.
    #[must_use]
    pub fn availability(&self) -> AvailabilityRepository<'_> {
        AvailabilityRepository::new(&self.inner.pool)
    }

    /// Reservation repository.
    #[must_use]
    pub fn reservations(&self) -> ReservationRepository<'_> {
        ReservationRepository::new(&self.inner.pool)
    }

    /// Admin user repository.
    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.inner.pool)
    }
}
