//! Admin login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use tower_sessions::Session;

use harborview_core::Email;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{clear_current_admin, flash, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub notice: Option<String>,
    pub warning: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        notice: flash::take_notice(&session).await,
        warning: flash::take_warning(&session).await,
    }
}

/// Handle the login form submission.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Ok(email) = Email::parse(&form.email) else {
        flash::set_warning(&session, "Invalid login credentials").await;
        return Ok(Redirect::to("/user/login").into_response());
    };

    match auth::authenticate(&state.users(), &email, &form.password).await {
        Ok(user) => {
            // New session id on privilege change
            session
                .cycle_id()
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            set_current_admin(&session, &CurrentAdmin::from(&user))
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;

            tracing::info!(user_id = %user.id, "Admin logged in");
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::debug!("Login rejected");
            flash::set_warning(&session, "Invalid login credentials").await;
            Ok(Redirect::to("/user/login").into_response())
        }
        Err(AuthError::Repository(e)) => Err(AppError::Database(e)),
    }
}

/// Log out: drop the admin from the session and rotate its id.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    flash::set_notice(&session, "You have been logged out.").await;
    Ok(Redirect::to("/user/login").into_response())
}
