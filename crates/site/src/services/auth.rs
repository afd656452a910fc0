//! Admin login verification.
//!
//! Not an authentication framework: one argon2 password check against the
//! `users` table, enough to gate the `/admin` surface.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use thiserror::Error;

use harborview_core::Email;

use crate::db::{RepositoryError, UserRepository};
use crate::models::AdminUser;

/// Errors from the login check.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or an unreadable stored hash.
    /// Deliberately one variant - login failures are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Store failure while looking up the account.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Verify an email/password pair against the admin accounts.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] for any non-matching input and
/// [`AuthError::Repository`] on store failure.
pub async fn authenticate(
    users: &UserRepository<'_>,
    email: &Email,
    password: &str,
) -> Result<AdminUser, AuthError> {
    let Some(user) = users.get_by_email(email).await? else {
        return Err(AuthError::InvalidCredentials);
    };

    let parsed =
        PasswordHash::new(&user.password_hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)?;

    Ok(user)
}
