//! Integration tests for Harborview Inn.
//!
//! # Running Tests
//!
//! The tests in `tests/` are `#[ignore]`-gated because they need live
//! infrastructure:
//!
//! - `booking_flow` drives the running site over HTTP
//!   (`HARBORVIEW_BASE_URL`, default `http://localhost:3000`)
//! - `availability_props` talks straight to `PostgreSQL`
//!   (`HARBORVIEW_DATABASE_URL` or `DATABASE_URL`)
//!
//! ```bash
//! hv-cli migrate && hv-cli seed
//! cargo run -p harborview-site &
//! cargo test -p harborview-integration-tests -- --ignored
//! ```

use chrono::{Datelike, NaiveDate, Utc};

/// Base URL of the running site (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("HARBORVIEW_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database URL for direct-pool tests.
///
/// # Panics
///
/// Panics when neither `HARBORVIEW_DATABASE_URL` nor `DATABASE_URL` is set -
/// the ignored tests require one.
#[must_use]
pub fn database_url() -> String {
    std::env::var("HARBORVIEW_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("HARBORVIEW_DATABASE_URL or DATABASE_URL must be set for integration tests")
}

/// A far-future date window unique to this test-run second, so repeated
/// runs against the same database never collide with earlier bookings.
///
/// `lane` separates tests running in the same process so their windows
/// never overlap each other either.
#[must_use]
pub fn unique_far_future_window(lane: i64, nights: i64) -> (String, String) {
    let base = NaiveDate::from_ymd_opt(2050, 1, 1).expect("valid date");
    let run_slot = Utc::now().timestamp() % 10_000;
    let offset = lane * 40_000 + run_slot * (nights + 1);
    let start = base + chrono::Duration::days(offset);
    let end = start + chrono::Duration::days(nights);
    (format_date(start), format_date(end))
}

fn format_date(d: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}
