//! Availability search handlers: the HTML flow and the JSON variant.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tower_sessions::Session;

use harborview_core::{RoomId, StayRange, stay::DATE_FORMAT};

use crate::error::AppError;
use crate::filters;
use crate::middleware::flash;
use crate::routes::pages::RoomView;
use crate::services::booking::{self, BookingError};
use crate::state::AppState;

/// Search form template.
#[derive(Template, WebTemplate)]
#[template(path = "search_availability.html")]
pub struct SearchTemplate {
    pub notice: Option<String>,
    pub warning: Option<String>,
}

/// Free-room listing template (workflow step 1 result).
#[derive(Template, WebTemplate)]
#[template(path = "choose_room.html")]
pub struct ChooseRoomTemplate {
    pub start_date: String,
    pub end_date: String,
    pub nights: i64,
    pub rooms: Vec<RoomView>,
}

/// Date-range search form data.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Display the availability search form.
#[instrument(skip_all)]
pub async fn search_page(session: Session) -> impl IntoResponse {
    SearchTemplate {
        notice: flash::take_notice(&session).await,
        warning: flash::take_warning(&session).await,
    }
}

/// Handle the search submission: list free rooms or notice that none are.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let stay = match StayRange::parse(&form.start, &form.end) {
        Ok(stay) => stay,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected search dates");
            flash::set_warning(&session, "Please enter a valid date range.").await;
            return Ok(Redirect::to("/search-availability").into_response());
        }
    };

    let rooms = match booking::start_search(&session, &state.availability(), stay).await {
        Ok(rooms) => rooms,
        Err(BookingError::NoRoomsAvailable) => {
            flash::set_notice(&session, "No rooms are available for those dates.").await;
            return Ok(Redirect::to("/search-availability").into_response());
        }
        Err(BookingError::Repository(e)) => return Err(AppError::Database(e)),
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    Ok(ChooseRoomTemplate {
        start_date: stay.start().format(DATE_FORMAT).to_string(),
        end_date: stay.end().format(DATE_FORMAT).to_string(),
        nights: stay.nights(),
        rooms: rooms.iter().map(RoomView::from).collect(),
    }
    .into_response())
}

/// Single-room availability form data (JSON variant).
#[derive(Debug, Deserialize)]
pub struct JsonSearchForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    pub room_id: Option<i32>,
}

/// JSON availability response.
#[derive(Debug, Serialize)]
pub struct JsonSearchResponse {
    pub ok: bool,
    pub message: String,
    pub start_date: String,
    pub end_date: String,
    pub room_id: String,
}

impl JsonSearchResponse {
    fn rejected(message: &str) -> Self {
        Self {
            ok: false,
            message: message.to_owned(),
            start_date: String::new(),
            end_date: String::new(),
            room_id: String::new(),
        }
    }
}

/// Check one room's availability, returning JSON for the room-page widget.
#[instrument(skip(state))]
pub async fn search_json(
    State(state): State<AppState>,
    Form(form): Form<JsonSearchForm>,
) -> Response {
    let Some(room_id) = form.room_id else {
        return Json(JsonSearchResponse::rejected("room id is required")).into_response();
    };

    let Ok(stay) = StayRange::parse(&form.start, &form.end) else {
        return Json(JsonSearchResponse::rejected("invalid date range")).into_response();
    };

    match state
        .availability()
        .is_room_available(RoomId::new(room_id), &stay)
        .await
    {
        Ok(available) => Json(JsonSearchResponse {
            ok: available,
            message: String::new(),
            start_date: stay.start().format(DATE_FORMAT).to_string(),
            end_date: stay.end().format(DATE_FORMAT).to_string(),
            room_id: room_id.to_string(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Availability query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(JsonSearchResponse::rejected("error querying availability")),
            )
                .into_response()
        }
    }
}
