//! Static and room page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;
use tower_sessions::Session;

use harborview_core::RoomId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::flash;
use crate::models::Room;
use crate::state::AppState;

/// Room display data for templates.
#[derive(Clone)]
pub struct RoomView {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_i32(),
            name: room.room_name.clone(),
            description: room.description.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub notice: Option<String>,
    pub warning: Option<String>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate;

/// Room listing template.
#[derive(Template, WebTemplate)]
#[template(path = "rooms/index.html")]
pub struct RoomsIndexTemplate {
    pub rooms: Vec<RoomView>,
}

/// Room detail template with the direct-booking date form.
#[derive(Template, WebTemplate)]
#[template(path = "rooms/show.html")]
pub struct RoomShowTemplate {
    pub room: RoomView,
    pub warning: Option<String>,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(session: Session) -> impl IntoResponse {
    HomeTemplate {
        notice: flash::take_notice(&session).await,
        warning: flash::take_warning(&session).await,
    }
}

/// Display the about page.
pub async fn about() -> impl IntoResponse {
    AboutTemplate
}

/// Display the contact page.
pub async fn contact() -> impl IntoResponse {
    ContactTemplate
}

/// Display the room listing.
#[instrument(skip_all)]
pub async fn rooms_index(State(state): State<AppState>) -> Result<Response, AppError> {
    let rooms = state.rooms().all().await?;
    let rooms = rooms.iter().map(RoomView::from).collect();
    Ok(RoomsIndexTemplate { rooms }.into_response())
}

/// Display one room with its direct-booking form.
#[instrument(skip(state, session))]
pub async fn rooms_show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let Some(room) = state.rooms().get(RoomId::new(id)).await? else {
        flash::set_warning(&session, "That room could not be found.").await;
        return Err(AppError::NotFound(format!("room {id}")));
    };

    Ok(RoomShowTemplate {
        room: RoomView::from(&room),
        warning: flash::take_warning(&session).await,
    }
    .into_response())
}
