//! Browser session cookie: one storage map per browser.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::auth::PasscodeAuth;
use crate::location::Location;
use crate::state::AppState;
use crate::storage::BrowserStorage;

pub const SESSION_COOKIE: &str = "prejoin_sid";

/// Open the caller's browser session, issuing a cookie on first visit.
pub fn open(state: &AppState, jar: CookieJar) -> (CookieJar, PasscodeAuth<BrowserStorage>) {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let (jar, session_id) = match existing {
        Some(id) => (jar, id),
        None => {
            let id = Uuid::new_v4();
            tracing::debug!(session_id = %id, "New browser session");
            let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.cookie_secure);
            (jar.add(cookie), id)
        }
    };

    let storage = BrowserStorage::new(state.sessions.clone(), session_id);
    (jar, PasscodeAuth::new(state.tokens.clone(), storage))
}

/// Open the session and silently restore any stored sign-in.
pub async fn restore(state: &AppState, jar: CookieJar) -> (CookieJar, PasscodeAuth<BrowserStorage>) {
    let (jar, mut auth) = open(state, jar);
    auth.initialize(&Location::default()).await;
    (jar, auth)
}
