//! Domain models for the booking site.

pub mod reservation;
pub mod room;
pub mod session;
pub mod user;

pub use reservation::{NewReservation, Reservation, RoomRestriction};
pub use room::Room;
pub use session::{BookingDraft, CompletedBooking, session_keys};
pub use user::{AdminUser, CurrentAdmin};
