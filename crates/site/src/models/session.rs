//! Session-carried booking state.
//!
//! The draft reservation lives in the session between "choose dates" and
//! "confirm". It is a typed serde struct: a value that fails to decode is
//! treated exactly like an absent draft (redirect with a notice), never a
//! panic.

use serde::{Deserialize, Serialize};

use harborview_core::{RoomId, StayRange};

/// An in-progress reservation carried across requests.
///
/// `stay` is fixed by the availability search (or a direct-booking deep
/// link); `room_id`/`room_name` are filled in once the guest picks a room.
/// The room name is only ever the server-side resolved name, never
/// client-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub stay: StayRange,
    pub room_id: Option<RoomId>,
    pub room_name: Option<String>,
}

impl BookingDraft {
    /// Start a draft from a chosen date range.
    #[must_use]
    pub const fn for_stay(stay: StayRange) -> Self {
        Self {
            stay,
            room_id: None,
            room_name: None,
        }
    }

    /// Fix a resolved room into the draft.
    pub fn set_room(&mut self, id: RoomId, name: String) {
        self.room_id = Some(id);
        self.room_name = Some(name);
    }
}

/// The finished booking shown once on the summary page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub room_name: String,
    pub start_date: String,
    pub end_date: String,
    pub nights: i64,
}

/// Session keys for booking and authentication state.
pub mod session_keys {
    /// Key for the in-progress booking draft.
    pub const BOOKING_DRAFT: &str = "booking_draft";

    /// Key for the read-once completed-booking summary.
    pub const COMPLETED_BOOKING: &str = "completed_booking";

    /// Key for the logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// One-shot informational notice, popped on next render.
    pub const NOTICE: &str = "notice";

    /// One-shot warning, popped on next render.
    pub const WARNING: &str = "warning";
}
