//! Booking flow handlers: room choice, direct booking, the guest form,
//! and the read-once summary.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use tower_sessions::Session;

use harborview_core::{RoomId, StayRange, stay::DATE_FORMAT};

use crate::error::AppError;
use crate::filters;
use crate::forms::{FormErrors, GuestForm};
use crate::middleware::flash;
use crate::models::CompletedBooking;
use crate::services::booking::{self, BookingError};
use crate::state::AppState;

/// Guest details form template.
#[derive(Template, WebTemplate)]
#[template(path = "make_reservation.html")]
pub struct MakeReservationTemplate {
    pub room_name: String,
    pub start_date: String,
    pub end_date: String,
    pub form: GuestForm,
    pub errors: FormErrors,
    pub notice: Option<String>,
}

/// Read-once booking summary template.
#[derive(Template, WebTemplate)]
#[template(path = "reservation_summary.html")]
pub struct SummaryTemplate {
    pub booking: CompletedBooking,
}

/// Translate workflow errors the handler did not recover from.
fn workflow_error(e: BookingError) -> AppError {
    match e {
        BookingError::Repository(e) => AppError::Database(e),
        other => AppError::Internal(other.to_string()),
    }
}

/// Redirect to search with the "start over" notice used whenever a step
/// needs a draft and finds none.
async fn restart_search(session: &Session) -> Response {
    flash::set_notice(
        session,
        "Your booking session has expired. Please search again.",
    )
    .await;
    Redirect::to("/search-availability").into_response()
}

/// Fix a chosen room into the draft (workflow step 2).
#[instrument(skip(state, session))]
pub async fn choose_room(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    match booking::choose_room(&session, &state.rooms(), RoomId::new(id)).await {
        Ok(()) => Ok(Redirect::to("/make-reservation").into_response()),
        Err(BookingError::DraftMissing) => Ok(restart_search(&session).await),
        Err(BookingError::RoomNotFound(room_id)) => {
            tracing::debug!(%room_id, "Stale room id in choose-room");
            flash::set_warning(&session, "That room could not be found.").await;
            Ok(Redirect::to("/search-availability").into_response())
        }
        Err(e) => Err(workflow_error(e)),
    }
}

/// Direct-booking deep link query parameters.
#[derive(Debug, Deserialize)]
pub struct BookRoomParams {
    pub id: Option<i32>,
    pub s: Option<String>,
    pub e: Option<String>,
}

/// Start a booking straight from a room page link carrying id and dates.
#[instrument(skip(state, session))]
pub async fn book_room(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<BookRoomParams>,
) -> Result<Response, AppError> {
    let (Some(id), Some(s), Some(e)) = (params.id, params.s.as_deref(), params.e.as_deref())
    else {
        flash::set_warning(&session, "Please pick your dates first.").await;
        return Ok(Redirect::to("/rooms").into_response());
    };

    let Ok(stay) = StayRange::parse(s, e) else {
        flash::set_warning(&session, "Please enter a valid date range.").await;
        return Ok(Redirect::to(&format!("/rooms/{id}")).into_response());
    };

    match booking::direct_book(&session, &state.rooms(), RoomId::new(id), stay).await {
        Ok(()) => Ok(Redirect::to("/make-reservation").into_response()),
        Err(BookingError::RoomNotFound(room_id)) => {
            tracing::debug!(%room_id, "Stale room id in book-room");
            flash::set_warning(&session, "That room could not be found.").await;
            Ok(Redirect::to("/rooms").into_response())
        }
        Err(e) => Err(workflow_error(e)),
    }
}

/// Display the guest details form (workflow step 3).
#[instrument(skip_all)]
pub async fn reservation_form(session: Session) -> Result<Response, AppError> {
    let (draft, _, room_name) = match booking::draft_with_room(&session).await {
        Ok(parts) => parts,
        Err(BookingError::DraftMissing) => return Ok(restart_search(&session).await),
        Err(e) => return Err(workflow_error(e)),
    };

    Ok(MakeReservationTemplate {
        room_name,
        start_date: draft.stay.start().format(DATE_FORMAT).to_string(),
        end_date: draft.stay.end().format(DATE_FORMAT).to_string(),
        form: GuestForm::default(),
        errors: FormErrors::default(),
        notice: flash::take_notice(&session).await,
    }
    .into_response())
}

/// Validate the guest details and book.
///
/// Invalid fields re-render the form with messages (HTTP 200, draft and
/// store untouched). A lost booking race sends the guest back to search.
#[instrument(skip_all)]
pub async fn post_reservation(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GuestForm>,
) -> Result<Response, AppError> {
    let (draft, _, room_name) = match booking::draft_with_room(&session).await {
        Ok(parts) => parts,
        Err(BookingError::DraftMissing) => return Ok(restart_search(&session).await),
        Err(e) => return Err(workflow_error(e)),
    };

    let guest = match form.validate() {
        Ok(guest) => guest,
        Err(errors) => {
            return Ok(MakeReservationTemplate {
                room_name,
                start_date: draft.stay.start().format(DATE_FORMAT).to_string(),
                end_date: draft.stay.end().format(DATE_FORMAT).to_string(),
                form,
                errors,
                notice: None,
            }
            .into_response());
        }
    };

    match booking::complete(&session, &state.reservations(), guest).await {
        Ok(_) => Ok(Redirect::to("/reservation-summary").into_response()),
        Err(BookingError::NoLongerAvailable) => {
            flash::set_warning(
                &session,
                "Sorry - that room was just booked by another guest. Please search again.",
            )
            .await;
            Ok(Redirect::to("/search-availability").into_response())
        }
        Err(BookingError::DraftMissing) => Ok(restart_search(&session).await),
        Err(e) => Err(workflow_error(e)),
    }
}

/// Show the booking summary once, then clear it from the session.
#[instrument(skip_all)]
pub async fn reservation_summary(session: Session) -> Result<Response, AppError> {
    let Some(summary) = booking::take_summary(&session).await else {
        flash::set_notice(&session, "There is no reservation summary to show.").await;
        return Ok(Redirect::to("/").into_response());
    };

    Ok(SummaryTemplate { booking: summary }.into_response())
}
