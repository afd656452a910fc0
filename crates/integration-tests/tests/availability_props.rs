//! Store-level availability properties, straight against `PostgreSQL`.
//!
//! These tests require a migrated database
//! (`HARBORVIEW_DATABASE_URL` or `DATABASE_URL`).
//!
//! Run with: `cargo test -p harborview-integration-tests -- --ignored`

use sqlx::PgPool;

use harborview_core::{Email, RoomId, StayRange};
use harborview_integration_tests::{database_url, unique_far_future_window};
use harborview_site::db::{AvailabilityRepository, RepositoryError, ReservationRepository};
use harborview_site::models::NewReservation;

async fn pool() -> PgPool {
    PgPool::connect(&database_url())
        .await
        .expect("failed to connect to test database")
}

/// Create a scratch room so tests never collide with the seeded inventory.
async fn scratch_room(pool: &PgPool, tag: &str) -> RoomId {
    let name = format!(
        "Test Room {tag} {}",
        chrono::Utc::now().timestamp_micros()
    );
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO rooms (room_name, description) VALUES ($1, 'scratch') RETURNING id",
    )
    .bind(&name)
    .fetch_one(pool)
    .await
    .expect("failed to create scratch room");
    RoomId::new(id)
}

fn guest(stay: StayRange, room_id: RoomId) -> NewReservation {
    NewReservation {
        first_name: "Pat".to_owned(),
        last_name: "Winslow".to_owned(),
        email: Email::parse("pat.winslow@example.com").expect("valid email"),
        phone: "555-0123".to_owned(),
        stay,
        room_id,
    }
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_fresh_room_available_for_disjoint_ranges() {
    let pool = pool().await;
    let room = scratch_room(&pool, "disjoint").await;
    let availability = AvailabilityRepository::new(&pool);

    let (s1, e1) = unique_far_future_window(10, 2);
    let (s2, e2) = unique_far_future_window(11, 3);
    let a = StayRange::parse(&s1, &e1).expect("valid range");
    let b = StayRange::parse(&s2, &e2).expect("valid range");

    assert!(availability.is_room_available(room, &a).await.expect("query"));
    assert!(availability.is_room_available(room, &b).await.expect("query"));
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_booking_blocks_range_but_not_boundary() {
    let pool = pool().await;
    let room = scratch_room(&pool, "boundary").await;
    let availability = AvailabilityRepository::new(&pool);
    let reservations = ReservationRepository::new(&pool);

    let (start, end) = unique_far_future_window(12, 3);
    let stay = StayRange::parse(&start, &end).expect("valid range");

    reservations.book(&guest(stay, room)).await.expect("booking");

    // The booked range is gone
    assert!(!availability.is_room_available(room, &stay).await.expect("query"));

    // The half-open boundary night [end, end+1) is still free
    let next_night = StayRange::new(stay.end(), stay.end() + chrono::Duration::days(1))
        .expect("valid range");
    assert!(
        availability
            .is_room_available(room, &next_night)
            .await
            .expect("query")
    );
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_find_available_rooms_is_idempotent() {
    let pool = pool().await;
    let availability = AvailabilityRepository::new(&pool);

    let (start, end) = unique_far_future_window(13, 2);
    let stay = StayRange::parse(&start, &end).expect("valid range");

    let first: Vec<i32> = availability
        .find_available_rooms(&stay)
        .await
        .expect("query")
        .iter()
        .map(|r| r.id.as_i32())
        .collect();
    let second: Vec<i32> = availability
        .find_available_rooms(&stay)
        .await
        .expect("query")
        .iter()
        .map(|r| r.id.as_i32())
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_concurrent_bookings_have_exactly_one_winner() {
    let pool = pool().await;
    let room = scratch_room(&pool, "race").await;
    let reservations = ReservationRepository::new(&pool);

    let (start, end) = unique_far_future_window(14, 2);
    let stay = StayRange::parse(&start, &end).expect("valid range");

    let first = guest(stay, room);
    let mut second = guest(stay, room);
    second.first_name = "Riley".to_owned();

    let (a, b) = tokio::join!(reservations.book(&first), reservations.book(&second));

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one booking must commit: {a:?} / {b:?}");

    let loser = if a.is_ok() { b } else { a };
    assert!(
        matches!(loser, Err(RepositoryError::Conflict(_))),
        "loser must observe a conflict: {loser:?}"
    );

    // Exactly one reservation row and one restriction row exist
    let reservation_count: i64 =
        sqlx::query_scalar("SELECT count(id) FROM reservations WHERE room_id = $1")
            .bind(room)
            .fetch_one(&pool)
            .await
            .expect("count");
    let restriction_count: i64 =
        sqlx::query_scalar("SELECT count(id) FROM room_restrictions WHERE room_id = $1")
            .bind(room)
            .fetch_one(&pool)
            .await
            .expect("count");
    assert_eq!(reservation_count, 1);
    assert_eq!(restriction_count, 1);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_overlapping_second_booking_rejected() {
    let pool = pool().await;
    let room = scratch_room(&pool, "overlap").await;
    let reservations = ReservationRepository::new(&pool);

    let (start, end) = unique_far_future_window(15, 4);
    let stay = StayRange::parse(&start, &end).expect("valid range");
    reservations.book(&guest(stay, room)).await.expect("booking");

    // A stay nested inside the booked range loses
    let inner = StayRange::new(
        stay.start() + chrono::Duration::days(1),
        stay.end() - chrono::Duration::days(1),
    )
    .expect("valid range");

    let result = reservations.book(&guest(inner, room)).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}
