//! End-to-end booking flow tests against a running site.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and the room seed
//!   applied (`hv-cli migrate && hv-cli seed`)
//! - The site running (`cargo run -p harborview-site`)
//!
//! Run with: `cargo test -p harborview-integration-tests -- --ignored`

use reqwest::{Client, StatusCode, redirect};
use serde_json::Value;

use harborview_integration_tests::{base_url, unique_far_future_window};

/// A client with a cookie store (sessions) that does not follow redirects,
/// so tests can assert on the redirect responses themselves.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Pick the first room id offered on a choose-room page.
fn first_choose_room_id(body: &str) -> Option<i32> {
    let marker = "/choose-room/";
    let at = body.find(marker)? + marker.len();
    let digits: String = body
        .get(at..)?
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[tokio::test]
#[ignore = "Requires running site and seeded database"]
async fn test_search_lists_available_room() {
    let client = client();
    let (start, end) = unique_far_future_window(1, 1);

    let resp = client
        .post(format!("{}/search-availability", base_url()))
        .form(&[("start", start.as_str()), ("end", end.as_str())])
        .send()
        .await
        .expect("search request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("failed to read body");
    assert!(
        body.contains("/choose-room/"),
        "expected at least one room link in: {body}"
    );
}

#[tokio::test]
#[ignore = "Requires running site and seeded database"]
async fn test_search_rejects_malformed_dates() {
    let client = client();

    let resp = client
        .post(format!("{}/search-availability", base_url()))
        .form(&[("start", "01/02/2050"), ("end", "not-a-date")])
        .send()
        .await
        .expect("search request failed");

    // Malformed dates are a validation problem, not a server error
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/search-availability");
}

#[tokio::test]
#[ignore = "Requires running site and seeded database"]
async fn test_short_first_name_rerenders_form_with_200() {
    let client = client();
    let (start, end) = unique_far_future_window(2, 1);

    // Establish a draft through the normal search flow
    let search = client
        .post(format!("{}/search-availability", base_url()))
        .form(&[("start", start.as_str()), ("end", end.as_str())])
        .send()
        .await
        .expect("search request failed");
    let body = search.text().await.expect("failed to read body");
    let room_id = first_choose_room_id(&body).expect("no room offered");

    let choose = client
        .get(format!("{}/choose-room/{room_id}", base_url()))
        .send()
        .await
        .expect("choose-room request failed");
    assert_eq!(choose.status(), StatusCode::SEE_OTHER);

    // First name below the minimum length re-renders the form
    let resp = client
        .post(format!("{}/make-reservation", base_url()))
        .form(&[
            ("first_name", "J"),
            ("last_name", "Smith"),
            ("email", "j.smith@example.com"),
            ("phone", "555-0100"),
        ])
        .send()
        .await
        .expect("reservation request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("failed to read body");
    assert!(body.contains("/make-reservation"), "form markup expected");
    assert!(
        body.contains("at least 3 characters"),
        "field message expected in: {body}"
    );

    // The draft survived: the same room and dates can still be booked
    let resp = client
        .post(format!("{}/make-reservation", base_url()))
        .form(&[
            ("first_name", "Jenna"),
            ("last_name", "Smith"),
            ("email", "j.smith@example.com"),
            ("phone", "555-0100"),
        ])
        .send()
        .await
        .expect("reservation request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "Requires running site and seeded database"]
async fn test_valid_booking_redirects_to_single_use_summary() {
    let client = client();
    let (start, end) = unique_far_future_window(3, 2);

    // Direct-booking deep link bypasses steps 1-2
    let search = client
        .post(format!("{}/search-availability", base_url()))
        .form(&[("start", start.as_str()), ("end", end.as_str())])
        .send()
        .await
        .expect("search request failed");
    let body = search.text().await.expect("failed to read body");
    let room_id = first_choose_room_id(&body).expect("no room offered");

    let book = client
        .get(format!(
            "{}/book-room?id={room_id}&s={start}&e={end}",
            base_url()
        ))
        .send()
        .await
        .expect("book-room request failed");
    assert_eq!(book.status(), StatusCode::SEE_OTHER);

    let resp = client
        .post(format!("{}/make-reservation", base_url()))
        .form(&[
            ("first_name", "Alma"),
            ("last_name", "Torres"),
            ("email", "alma.torres@example.com"),
            ("phone", ""),
        ])
        .send()
        .await
        .expect("reservation request failed");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/reservation-summary");

    // First fetch renders the summary
    let summary = client
        .get(format!("{}/reservation-summary", base_url()))
        .send()
        .await
        .expect("summary request failed");
    assert_eq!(summary.status(), StatusCode::OK);
    let body = summary.text().await.expect("failed to read body");
    assert!(body.contains("Alma"), "summary should name the guest");

    // Second fetch finds no draft and bounces home
    let again = client
        .get(format!("{}/reservation-summary", base_url()))
        .send()
        .await
        .expect("summary request failed");
    assert_eq!(again.status(), StatusCode::SEE_OTHER);
    let location = again
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/");
}

#[tokio::test]
#[ignore = "Requires running site and seeded database"]
async fn test_choose_room_with_stale_id_redirects_with_notice() {
    let client = client();
    let (start, end) = unique_far_future_window(4, 1);

    let search = client
        .post(format!("{}/search-availability", base_url()))
        .form(&[("start", start.as_str()), ("end", end.as_str())])
        .send()
        .await
        .expect("search request failed");
    assert_eq!(search.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/choose-room/999999", base_url()))
        .send()
        .await
        .expect("choose-room request failed");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/search-availability");

    // The notice shows up on the search page
    let page = client
        .get(format!("{}/search-availability", base_url()))
        .send()
        .await
        .expect("search page request failed");
    let body = page.text().await.expect("failed to read body");
    assert!(
        body.contains("could not be found"),
        "warning expected in: {body}"
    );
}

#[tokio::test]
#[ignore = "Requires running site and seeded database"]
async fn test_availability_json_reports_free_room() {
    let client = client();
    let (start, end) = unique_far_future_window(5, 1);

    let search = client
        .post(format!("{}/search-availability", base_url()))
        .form(&[("start", start.as_str()), ("end", end.as_str())])
        .send()
        .await
        .expect("search request failed");
    let body = search.text().await.expect("failed to read body");
    let room_id = first_choose_room_id(&body).expect("no room offered");

    let resp = client
        .post(format!("{}/search-availability-json", base_url()))
        .form(&[
            ("start", start.as_str()),
            ("end", end.as_str()),
            ("room_id", &room_id.to_string()),
        ])
        .send()
        .await
        .expect("json availability request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = resp.json().await.expect("invalid JSON");
    assert_eq!(json["ok"], Value::Bool(true));
    assert_eq!(json["start_date"], Value::String(start));
    assert_eq!(json["room_id"], Value::String(room_id.to_string()));
}

#[tokio::test]
#[ignore = "Requires running site"]
async fn test_admin_routes_require_login() {
    let client = client();

    for path in [
        "/admin/dashboard",
        "/admin/reservations-new",
        "/admin/reservations-all",
        "/admin/reservation-calendar",
    ] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("admin request failed");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(location, "/user/login", "{path}");
    }
}
