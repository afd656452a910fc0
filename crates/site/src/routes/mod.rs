//! HTTP route handlers for the booking site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /about                     - About page
//! GET  /contact                   - Contact page
//! GET  /rooms                     - Room listing
//! GET  /rooms/{id}                - Room detail with a direct-booking form
//!
//! # Availability & booking
//! GET  /search-availability       - Date-range search form
//! POST /search-availability       - Search; lists free rooms or notices
//! POST /search-availability-json  - JSON availability for one room
//! GET  /choose-room/{id}          - Fix a searched room into the draft
//! GET  /book-room                 - Direct-booking deep link (?id&s&e)
//! GET  /make-reservation          - Guest details form
//! POST /make-reservation          - Validate and book
//! GET  /reservation-summary       - Read-once confirmation
//!
//! # Auth
//! GET  /user/login                - Login page
//! POST /user/login                - Login action
//! GET  /user/logout               - Logout
//!
//! # Admin (session-authenticated)
//! GET  /admin/dashboard
//! GET  /admin/reservations-new
//! GET  /admin/reservations-all
//! GET  /admin/reservation-calendar
//! GET  /admin/reservations/{src}/{id}
//! POST /admin/reservations/{src}/{id}
//! GET  /admin/process-reservation/{src}/{id}
//! GET  /admin/delete-reservation/{src}/{id}
//! ```

pub mod admin;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the public page routes.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/rooms", get(pages::rooms_index))
        .route("/rooms/{id}", get(pages::rooms_show))
}

/// Create the availability and booking routes.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/search-availability",
            get(availability::search_page).post(availability::search),
        )
        .route(
            "/search-availability-json",
            post(availability::search_json),
        )
        .route("/choose-room/{id}", get(booking::choose_room))
        .route("/book-room", get(booking::book_room))
        .route(
            "/make-reservation",
            get(booking::reservation_form).post(booking::post_reservation),
        )
        .route("/reservation-summary", get(booking::reservation_summary))
}

/// Create the auth routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the admin routes. Each handler requires a logged-in admin via
/// the `RequireAdmin` extractor.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/reservations-new", get(admin::reservations_new))
        .route("/reservations-all", get(admin::reservations_all))
        .route("/reservation-calendar", get(admin::calendar))
        .route(
            "/reservations/{src}/{id}",
            get(admin::show_reservation).post(admin::update_reservation),
        )
        .route(
            "/process-reservation/{src}/{id}",
            get(admin::process_reservation),
        )
        .route(
            "/delete-reservation/{src}/{id}",
            get(admin::delete_reservation),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .merge(booking_routes())
        .nest("/user", auth_routes())
        .nest("/admin", admin_routes())
}
