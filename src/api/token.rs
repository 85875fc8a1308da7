use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::Value;

use crate::api::session;
use crate::error::{AppError, Result};
use crate::models::{RecordingRule, TokenResponse};
use crate::state::AppState;

/// JSON routes used by the in-room client
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(fetch_token))
        .route("/recordingrules", post(update_recording_rules))
}

#[derive(Debug, Deserialize)]
pub struct FetchTokenRequest {
    pub user_identity: String,
    pub room_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordingRulesRequest {
    pub room_sid: String,
    pub rules: Vec<RecordingRule>,
}

/// POST /api/token - Token for the signed-in browser session
async fn fetch_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<FetchTokenRequest>,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    if request.user_identity.is_empty() || request.room_name.is_empty() {
        return Err(AppError::BadRequest(
            "user_identity and room_name are required".to_string(),
        ));
    }

    let (jar, auth) = session::restore(&state, jar).await;
    let token = auth
        .fetch_session_token(&request.user_identity, &request.room_name)
        .await?;

    Ok((jar, Json(token)))
}

/// POST /api/recordingrules - Forward recording rules with the session passcode
async fn update_recording_rules(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<UpdateRecordingRulesRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    let (jar, auth) = session::restore(&state, jar).await;
    let rules = auth
        .update_recording_rules(&request.room_sid, &request.rules)
        .await?;

    tracing::info!(room_sid = %request.room_sid, count = request.rules.len(), "Recording rules updated");
    Ok((jar, Json(rules)))
}
