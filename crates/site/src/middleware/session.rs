//! Session middleware configuration and flash messages.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. Flash
//! messages are one-shot session values: set on redirect, popped on the
//! next render.

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::SiteConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "hv_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with a `PostgreSQL` store.
///
/// The session table is created by `hv-cli migrate`, not here.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &SiteConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// One-shot flash messages.
pub mod flash {
    use super::{Session, session_keys};

    /// Set the informational notice shown on the next rendered page.
    pub async fn set_notice(session: &Session, message: &str) {
        if let Err(e) = session.insert(session_keys::NOTICE, message).await {
            tracing::warn!(error = %e, "Failed to set flash notice");
        }
    }

    /// Set the warning shown on the next rendered page.
    pub async fn set_warning(session: &Session, message: &str) {
        if let Err(e) = session.insert(session_keys::WARNING, message).await {
            tracing::warn!(error = %e, "Failed to set flash warning");
        }
    }

    /// Pop the pending notice, if any.
    pub async fn take_notice(session: &Session) -> Option<String> {
        session
            .remove::<String>(session_keys::NOTICE)
            .await
            .ok()
            .flatten()
    }

    /// Pop the pending warning, if any.
    pub async fn take_warning(session: &Session) -> Option<String> {
        session
            .remove::<String>(session_keys::WARNING)
            .await
            .ok()
            .flatten()
    }
}
