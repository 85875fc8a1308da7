use axum::{
    extract::{Form, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::session;
use crate::auth::Navigation;
use crate::error::{AppError, AuthError, Result};
use crate::location::Location;
use crate::models::TokenResponse;
use crate::screens::{self, Logo, RoomNameScreen, SignInScreen};
use crate::state::AppState;

/// Pre-join page routes
pub fn prejoin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/signin", post(sign_in))
        .route("/signout", post(sign_out))
        .route("/join", post(join))
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub passcode: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "roomName")]
    pub room_name: String,
}

const SIGN_IN_UNAVAILABLE: &str = "Unable to verify the passcode right now. Please try again.";

// The form posts back with the page's query so the join link survives sign-in.
fn sign_in_page(state: &AppState, location: &Location, error: Option<String>) -> Html<String> {
    let logo = Logo::new(state.config.logo_url.as_str());
    let screen = SignInScreen::new(error);
    let action = location.carry_to("/signin");
    Html(screens::page("Sign in", &logo, &screen.render(&action)))
}

// Wrong passcodes are the user's to fix; backend trouble is not.
fn sign_in_failure(e: &AuthError) -> (StatusCode, String) {
    match e {
        AuthError::InvalidPasscode { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        AuthError::NotSignedIn => (StatusCode::UNAUTHORIZED, e.to_string()),
        AuthError::Server { .. } | AuthError::Transport(_) => {
            (StatusCode::BAD_GATEWAY, SIGN_IN_UNAVAILABLE.to_string())
        }
    }
}

/// GET / - one page load: silent re-authentication, then the matching screen
async fn index(State(state): State<AppState>, jar: CookieJar, uri: Uri) -> Response {
    let location = Location::from_uri(&uri);
    let (jar, mut auth) = session::open(&state, jar);

    if let Navigation::Replace(path) = auth.initialize(&location).await {
        return (jar, Redirect::to(&path)).into_response();
    }

    let Some(user) = auth.user() else {
        return (jar, sign_in_page(&state, &location, None)).into_response();
    };

    let screen = RoomNameScreen::mount(
        user.display_name.as_str(),
        auth.room_name(),
        true,
        &location,
    );
    let logo = Logo::new(state.config.logo_url.as_str());
    let html = screens::page("Join a Room", &logo, &screen.render("/join"));

    (jar, Html(html)).into_response()
}

/// POST /signin - explicit passcode sign-in, back to the join link on success
async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    uri: Uri,
    Form(form): Form<SignInForm>,
) -> Response {
    let location = Location::from_uri(&uri);
    let (jar, mut auth) = session::open(&state, jar);

    match auth.sign_in(form.passcode.trim()).await {
        Ok(()) => (jar, Redirect::to(&location.carry_to("/"))).into_response(),
        Err(e) => {
            let (status, message) = sign_in_failure(&e);
            if status == StatusCode::BAD_GATEWAY {
                tracing::warn!(error = %e, "Sign-in failed at the token backend");
            } else {
                tracing::info!(error = %e, "Sign-in rejected");
            }
            (
                status,
                jar,
                sign_in_page(&state, &location, Some(message)),
            )
                .into_response()
        }
    }
}

/// POST /signout
async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, mut auth) = session::open(&state, jar);
    auth.sign_out();
    (jar, Redirect::to("/")).into_response()
}

/// POST /join - submit of the join-room screen
async fn join(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<JoinForm>,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    if form.name.is_empty() || form.room_name.is_empty() {
        return Err(AppError::BadRequest(
            "Name and room name are required".to_string(),
        ));
    }

    let (jar, auth) = session::restore(&state, jar).await;
    let token = auth.fetch_session_token(&form.name, &form.room_name).await?;

    tracing::info!(room = %form.room_name, "Joining room");
    Ok((jar, Json(token)))
}
