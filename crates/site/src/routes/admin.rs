//! Admin review handlers: dashboard, reservation listings, calendar, and
//! per-reservation show/update/process/delete.
//!
//! Listing-origin (`src`) is carried through the per-reservation routes so
//! back-navigation returns to the listing the admin came from.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use tracing::instrument;
use tower_sessions::Session;

use harborview_core::{ReservationId, stay::DATE_FORMAT};

use crate::error::AppError;
use crate::filters;
use crate::forms::{FormErrors, GuestForm};
use crate::middleware::{RequireAdmin, flash};
use crate::models::{Reservation, Room, RoomRestriction};
use crate::state::AppState;

// =============================================================================
// View types
// =============================================================================

/// Reservation row for the admin listings.
#[derive(Clone)]
pub struct ReservationRow {
    pub id: i32,
    pub guest_name: String,
    pub email: String,
    pub room_name: String,
    pub start_date: String,
    pub end_date: String,
    pub processed: bool,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.as_i32(),
            guest_name: r.guest_name(),
            email: r.email.to_string(),
            room_name: r.room_name.clone(),
            start_date: r.start_date.format(DATE_FORMAT).to_string(),
            end_date: r.end_date.format(DATE_FORMAT).to_string(),
            processed: r.processed.is_processed(),
        }
    }
}

/// One room's blocks on the calendar.
pub struct CalendarRoomView {
    pub name: String,
    pub entries: Vec<CalendarEntryView>,
}

/// One restriction on the calendar.
pub struct CalendarEntryView {
    pub start_date: String,
    pub end_date: String,
    pub kind: String,
    pub reservation_id: Option<i32>,
}

impl From<&RoomRestriction> for CalendarEntryView {
    fn from(r: &RoomRestriction) -> Self {
        Self {
            start_date: r.start_date.format(DATE_FORMAT).to_string(),
            end_date: r.end_date.format(DATE_FORMAT).to_string(),
            kind: r.kind.label().to_owned(),
            reservation_id: r.reservation_id.map(|id| id.as_i32()),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub new_count: usize,
    pub total_count: usize,
}

/// Reservation listing template, shared by the new and all views.
#[derive(Template, WebTemplate)]
#[template(path = "admin/reservations.html")]
pub struct ReservationsTemplate {
    pub title: String,
    pub src: String,
    pub rows: Vec<ReservationRow>,
    pub notice: Option<String>,
}

/// Per-reservation detail template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/reservation_show.html")]
pub struct ReservationShowTemplate {
    pub src: String,
    pub reservation_id: i32,
    pub room_name: String,
    pub start_date: String,
    pub end_date: String,
    pub processed: bool,
    pub form: GuestForm,
    pub errors: FormErrors,
}

/// Month calendar template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/calendar.html")]
pub struct CalendarTemplate {
    pub month_label: String,
    pub prev_link: String,
    pub next_link: String,
    pub rooms: Vec<CalendarRoomView>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Normalize the listing-origin path segment.
fn listing_src(src: &str) -> &'static str {
    if src == "new" { "new" } else { "all" }
}

/// Listing URL for a normalized `src`.
fn listing_url(src: &str) -> String {
    format!("/admin/reservations-{}", listing_src(src))
}

/// Load a reservation or bounce back to the originating listing.
async fn load_reservation(
    state: &AppState,
    session: &Session,
    src: &str,
    id: i32,
) -> Result<Result<Reservation, Response>, AppError> {
    match state.reservations().get(ReservationId::new(id)).await? {
        Some(reservation) => Ok(Ok(reservation)),
        None => {
            flash::set_warning(session, "Reservation not found.").await;
            Ok(Err(Redirect::to(&listing_url(src)).into_response()))
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the dashboard.
#[instrument(skip_all)]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let new_count = state.reservations().all_new().await?.len();
    let total_count = state.reservations().all().await?.len();

    Ok(DashboardTemplate {
        admin_name: admin.first_name,
        new_count,
        total_count,
    }
    .into_response())
}

/// List reservations awaiting review.
#[instrument(skip_all)]
pub async fn reservations_new(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let reservations = state.reservations().all_new().await?;
    Ok(ReservationsTemplate {
        title: "New Reservations".to_owned(),
        src: "new".to_owned(),
        rows: reservations.iter().map(ReservationRow::from).collect(),
        notice: flash::take_notice(&session).await,
    }
    .into_response())
}

/// List all reservations.
#[instrument(skip_all)]
pub async fn reservations_all(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let reservations = state.reservations().all().await?;
    Ok(ReservationsTemplate {
        title: "All Reservations".to_owned(),
        src: "all".to_owned(),
        rows: reservations.iter().map(ReservationRow::from).collect(),
        notice: flash::take_notice(&session).await,
    }
    .into_response())
}

/// Calendar query parameters.
#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub y: Option<i32>,
    pub m: Option<u32>,
}

/// Month view of reservations and blocks per room.
#[instrument(skip(state, _admin))]
pub async fn calendar(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let year = params.y.unwrap_or_else(|| today.year());
    let month = params.m.unwrap_or_else(|| today.month());

    // An out-of-range month query falls back to the current month.
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let (year, month) = (first.year(), first.month());
    let (next_y, next_m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let (prev_y, prev_m) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
    let next_first = NaiveDate::from_ymd_opt(next_y, next_m, 1).unwrap_or(first);

    let rooms = state.rooms().all().await?;
    let restrictions = state
        .reservations()
        .restrictions_overlapping(first, next_first)
        .await?;

    let rooms = rooms
        .iter()
        .map(|room: &Room| CalendarRoomView {
            name: room.room_name.clone(),
            entries: restrictions
                .iter()
                .filter(|r| r.room_id == room.id)
                .map(CalendarEntryView::from)
                .collect(),
        })
        .collect();

    Ok(CalendarTemplate {
        month_label: first.format("%B %Y").to_string(),
        prev_link: format!("/admin/reservation-calendar?y={prev_y}&m={prev_m}"),
        next_link: format!("/admin/reservation-calendar?y={next_y}&m={next_m}"),
        rooms,
    }
    .into_response())
}

/// Show one reservation for review and editing.
#[instrument(skip(state, session, _admin))]
pub async fn show_reservation(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, i32)>,
) -> Result<Response, AppError> {
    let reservation = match load_reservation(&state, &session, &src, id).await? {
        Ok(reservation) => reservation,
        Err(redirect) => return Ok(redirect),
    };

    Ok(ReservationShowTemplate {
        src: listing_src(&src).to_owned(),
        reservation_id: reservation.id.as_i32(),
        room_name: reservation.room_name.clone(),
        start_date: reservation.start_date.format(DATE_FORMAT).to_string(),
        end_date: reservation.end_date.format(DATE_FORMAT).to_string(),
        processed: reservation.processed.is_processed(),
        form: GuestForm {
            first_name: reservation.first_name,
            last_name: reservation.last_name,
            email: reservation.email.into_inner(),
            phone: reservation.phone,
        },
        errors: FormErrors::default(),
    }
    .into_response())
}

/// Update the guest contact fields of a reservation.
#[instrument(skip(state, session, _admin, form))]
pub async fn update_reservation(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, i32)>,
    Form(form): Form<GuestForm>,
) -> Result<Response, AppError> {
    let reservation = match load_reservation(&state, &session, &src, id).await? {
        Ok(reservation) => reservation,
        Err(redirect) => return Ok(redirect),
    };

    let guest = match form.validate() {
        Ok(guest) => guest,
        Err(errors) => {
            // Re-render with the submitted values and messages
            return Ok(ReservationShowTemplate {
                src: listing_src(&src).to_owned(),
                reservation_id: reservation.id.as_i32(),
                room_name: reservation.room_name.clone(),
                start_date: reservation.start_date.format(DATE_FORMAT).to_string(),
                end_date: reservation.end_date.format(DATE_FORMAT).to_string(),
                processed: reservation.processed.is_processed(),
                form,
                errors,
            }
            .into_response());
        }
    };

    state
        .reservations()
        .update_guest(
            reservation.id,
            &guest.first_name,
            &guest.last_name,
            &guest.email,
            &guest.phone,
        )
        .await?;

    flash::set_notice(&session, "Changes saved.").await;
    Ok(Redirect::to(&listing_url(&src)).into_response())
}

/// Toggle the processed marker on a reservation.
#[instrument(skip(state, session, _admin))]
pub async fn process_reservation(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, i32)>,
) -> Result<Response, AppError> {
    let reservation = match load_reservation(&state, &session, &src, id).await? {
        Ok(reservation) => reservation,
        Err(redirect) => return Ok(redirect),
    };

    let flag = reservation.processed.toggled();
    state.reservations().set_processed(reservation.id, flag).await?;

    let message = if flag.is_processed() {
        "Reservation marked as processed."
    } else {
        "Reservation marked as new."
    };
    flash::set_notice(&session, message).await;
    Ok(Redirect::to(&listing_url(&src)).into_response())
}

/// Hard-delete a reservation; its restriction rows cascade.
#[instrument(skip(state, session, _admin))]
pub async fn delete_reservation(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, i32)>,
) -> Result<Response, AppError> {
    match state.reservations().delete(ReservationId::new(id)).await {
        Ok(()) => {
            flash::set_notice(&session, "Reservation deleted.").await;
        }
        Err(crate::db::RepositoryError::NotFound) => {
            flash::set_warning(&session, "Reservation not found.").await;
        }
        Err(e) => return Err(AppError::Database(e)),
    }
    Ok(Redirect::to(&listing_url(&src)).into_response())
}
