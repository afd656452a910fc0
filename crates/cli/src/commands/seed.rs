//! Seed the rooms table.
//!
//! Rooms are immutable reference data; the seed is idempotent.

use super::{CommandError, connect};

const ROOMS: &[(&str, &str)] = &[
    (
        "Captain's Quarters",
        "Our largest room, with a king bed, a writing desk, and the widest \
         view of the harbor mouth.",
    ),
    (
        "Lighthouse Suite",
        "A bright corner room under the gable, queen bed, clawfoot tub, and \
         a direct line of sight to the light at Point Meridian.",
    ),
    (
        "Quayside Room",
        "Cozy and quiet at the back of the house, double bed, best for \
         travellers who plan to be out on the water all day.",
    ),
];

/// Insert the standard rooms if they are not already present.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn rooms() -> Result<(), CommandError> {
    let pool = connect().await?;

    for (name, description) in ROOMS {
        sqlx::query(
            r"
            INSERT INTO rooms (room_name, description)
            VALUES ($1, $2)
            ON CONFLICT (room_name) DO NOTHING
            ",
        )
        .bind(name)
        .bind(description)
        .execute(&pool)
        .await?;
    }

    tracing::info!("Seeded {} rooms", ROOMS.len());
    Ok(())
}
