//! HTTP middleware: sessions, flash messages, and admin auth.

pub mod auth;
pub mod session;

pub use auth::{AdminRejection, RequireAdmin, clear_current_admin, set_current_admin};
pub use session::{create_session_layer, flash};
