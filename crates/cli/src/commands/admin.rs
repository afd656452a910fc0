//! Admin account creation.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};

use harborview_core::Email;

use super::{CommandError, connect};

/// Create an admin account with an argon2-hashed password.
///
/// # Errors
///
/// Returns `CommandError::InvalidInput` for a malformed email or a password
/// that fails to hash, and `CommandError::Database` on store failure (for
/// example a duplicate email).
pub async fn create_user(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidInput(format!("email: {e}")))?;

    if password.len() < 8 {
        return Err(CommandError::InvalidInput(
            "password must be at least 8 characters".to_owned(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CommandError::InvalidInput(format!("password hash: {e}")))?
        .to_string();

    let pool = connect().await?;

    sqlx::query(
        r"
        INSERT INTO users (first_name, last_name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email.as_str())
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    tracing::info!(email = %email, "Admin account created");
    Ok(())
}
