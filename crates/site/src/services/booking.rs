//! The reservation workflow.
//!
//! A booking moves through `NoDraft -> DatesChosen -> RoomChosen ->
//! DetailsEntered -> Confirmed`, with the draft carried in the guest's
//! session between steps. Any step that needs a draft and finds none is
//! recoverable: the caller redirects to the search page with a notice.
//! Store and session handles come in as arguments on every call.

use thiserror::Error;
use tower_sessions::Session;

use harborview_core::{RoomId, StayRange, stay::DATE_FORMAT};

use crate::db::{
    AvailabilityRepository, RepositoryError, ReservationRepository, RoomRepository,
};
use crate::forms::GuestDetails;
use crate::models::{BookingDraft, CompletedBooking, NewReservation, Room, session_keys};

/// Errors from the booking workflow.
#[derive(Debug, Error)]
pub enum BookingError {
    /// No room is free for the requested dates. The guest stays on the
    /// search page with a notice.
    #[error("no rooms available for the requested dates")]
    NoRoomsAvailable,

    /// A step that needs an in-progress booking found none (expired
    /// session, deep link, or a draft that failed to decode).
    #[error("no booking in progress")]
    DraftMissing,

    /// The referenced room does not exist (stale or tampered ID).
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// A concurrent booking took the room between search and confirm.
    /// Recoverable by retrying as a new search.
    #[error("room was booked by someone else")]
    NoLongerAvailable,

    /// Store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Load the current draft, if any.
///
/// A value that fails to decode counts as absent - the workflow treats it
/// as an abandoned booking, never a panic.
pub async fn draft(session: &Session) -> Option<BookingDraft> {
    session
        .get::<BookingDraft>(session_keys::BOOKING_DRAFT)
        .await
        .ok()
        .flatten()
}

async fn save_draft(session: &Session, draft: &BookingDraft) -> Result<(), BookingError> {
    session
        .insert(session_keys::BOOKING_DRAFT, draft)
        .await
        .map_err(BookingError::from)
}

/// Drop any in-progress booking.
pub async fn clear_draft(session: &Session) {
    let _ = session
        .remove::<BookingDraft>(session_keys::BOOKING_DRAFT)
        .await;
}

/// Step 1: the guest submits a date range.
///
/// On success the draft is `DatesChosen` and the free rooms are returned
/// for the guest to pick from. When nothing is free the session is left
/// untouched.
///
/// # Errors
///
/// [`BookingError::NoRoomsAvailable`] when every room is taken;
/// [`BookingError::Repository`] on store failure.
pub async fn start_search(
    session: &Session,
    availability: &AvailabilityRepository<'_>,
    stay: StayRange,
) -> Result<Vec<Room>, BookingError> {
    let rooms = availability.find_available_rooms(&stay).await?;
    if rooms.is_empty() {
        return Err(BookingError::NoRoomsAvailable);
    }

    save_draft(session, &BookingDraft::for_stay(stay)).await?;
    Ok(rooms)
}

/// Step 2: the guest picks a room from the presented list.
///
/// The room is re-fetched by ID - a stale or tampered ID fails without
/// touching the draft.
///
/// # Errors
///
/// [`BookingError::DraftMissing`] without a prior search;
/// [`BookingError::RoomNotFound`] for an unknown ID.
pub async fn choose_room(
    session: &Session,
    rooms: &RoomRepository<'_>,
    room_id: RoomId,
) -> Result<(), BookingError> {
    let mut draft = draft(session).await.ok_or(BookingError::DraftMissing)?;

    let room = rooms
        .get(room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;

    draft.set_room(room.id, room.room_name);
    save_draft(session, &draft).await
}

/// Direct-booking shortcut: a deep link carrying room ID and dates.
///
/// Replaces any existing draft. The room is always re-resolved server-side;
/// a client-supplied room name is never trusted.
///
/// # Errors
///
/// [`BookingError::RoomNotFound`] for an unknown ID.
pub async fn direct_book(
    session: &Session,
    rooms: &RoomRepository<'_>,
    room_id: RoomId,
    stay: StayRange,
) -> Result<(), BookingError> {
    let room = rooms
        .get(room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;

    let mut draft = BookingDraft::for_stay(stay);
    draft.set_room(room.id, room.room_name);
    save_draft(session, &draft).await
}

/// The draft with its chosen room, for the guest-details form.
///
/// # Errors
///
/// [`BookingError::DraftMissing`] when there is no draft or the guest has
/// not picked a room yet.
pub async fn draft_with_room(
    session: &Session,
) -> Result<(BookingDraft, RoomId, String), BookingError> {
    let draft = draft(session).await.ok_or(BookingError::DraftMissing)?;
    let (Some(room_id), Some(room_name)) = (draft.room_id, draft.room_name.clone()) else {
        return Err(BookingError::DraftMissing);
    };
    Ok((draft, room_id, room_name))
}

/// Step 3: validated guest details arrive; persist the reservation and its
/// restriction as one unit.
///
/// On success the draft is consumed and the read-once summary takes its
/// place. A lost race clears the draft so the guest restarts from search.
///
/// # Errors
///
/// [`BookingError::DraftMissing`] without a complete draft;
/// [`BookingError::NoLongerAvailable`] when a concurrent booking won;
/// [`BookingError::Repository`] on store failure (nothing committed).
pub async fn complete(
    session: &Session,
    reservations: &ReservationRepository<'_>,
    guest: GuestDetails,
) -> Result<CompletedBooking, BookingError> {
    let (draft, room_id, room_name) = draft_with_room(session).await?;

    let new = NewReservation {
        first_name: guest.first_name,
        last_name: guest.last_name,
        email: guest.email,
        phone: guest.phone,
        stay: draft.stay,
        room_id,
    };

    let reservation_id = match reservations.book(&new).await {
        Ok(id) => id,
        Err(RepositoryError::Conflict(reason)) => {
            tracing::info!(room_id = %room_id, %reason, "Booking lost a concurrent race");
            clear_draft(session).await;
            return Err(BookingError::NoLongerAvailable);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        reservation_id = %reservation_id,
        room_id = %room_id,
        stay = %draft.stay,
        "Reservation confirmed"
    );

    let summary = CompletedBooking {
        first_name: new.first_name,
        last_name: new.last_name,
        email: new.email.into_inner(),
        room_name,
        start_date: draft.stay.start().format(DATE_FORMAT).to_string(),
        end_date: draft.stay.end().format(DATE_FORMAT).to_string(),
        nights: draft.stay.nights(),
    };

    clear_draft(session).await;
    session
        .insert(session_keys::COMPLETED_BOOKING, &summary)
        .await?;

    Ok(summary)
}

/// Pop the read-once booking summary. The second fetch returns `None`.
pub async fn take_summary(session: &Session) -> Option<CompletedBooking> {
    session
        .remove::<CompletedBooking>(session_keys::COMPLETED_BOOKING)
        .await
        .ok()
        .flatten()
}
