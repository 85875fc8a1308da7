use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, AuthError};
use crate::models::{
    ErrorEnvelope, RecordingRule, RecordingRulesRequest, TokenRequest, TokenResponse,
    VerificationResult,
};

use super::error_message;

/// Identity and room sent when only checking a passcode
pub const VERIFY_IDENTITY: &str = "temp-name";
pub const VERIFY_ROOM: &str = "temp-room";

const RECORDING_RULES_FALLBACK: &str = "There was an error updating recording rules";

/// HTTP client for the token backend
#[derive(Clone)]
pub struct TokenClient {
    http: Client,
    token_url: Url,
    recording_rules_url: Url,
    create_conversation: bool,
}

impl TokenClient {
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token_url: config.token_url()?,
            recording_rules_url: config.recording_rules_url()?,
            create_conversation: !config.disable_conversations,
        })
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    async fn fetch_token(&self, request: &TokenRequest) -> Result<Response, AuthError> {
        tracing::debug!(
            room = %request.room_name,
            create_room = request.create_room,
            "Requesting token"
        );

        let res = self
            .http
            .post(self.token_url.clone())
            .json(request)
            .send()
            .await?;

        Ok(res)
    }

    /// Check a passcode without creating a room or conversation.
    pub async fn verify(&self, passcode: &str) -> Result<VerificationResult, AuthError> {
        let res = self
            .fetch_token(&TokenRequest {
                user_identity: VERIFY_IDENTITY.to_string(),
                room_name: VERIFY_ROOM.to_string(),
                passcode: passcode.to_string(),
                create_room: false,
                create_conversation: false,
            })
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
            let message = envelope
                .message()
                .unwrap_or_else(|| status_text(status))
                .to_string();
            return Ok(VerificationResult::Invalid(message));
        }

        if status.is_success() {
            let has_token = serde_json::from_str::<TokenResponse>(&body)
                .map(|t| !t.token.is_empty())
                .unwrap_or(false);
            if has_token {
                return Ok(VerificationResult::Valid);
            }

            return Err(AuthError::Server {
                message: "Token backend returned no token".to_string(),
                code: None,
                status: Some(status.as_u16()),
            });
        }

        Err(server_error(status, &body, None))
    }

    /// Fetch the access token used to connect to `room`.
    pub async fn fetch_session_token(
        &self,
        name: &str,
        room: &str,
        passcode: &str,
    ) -> Result<TokenResponse, AuthError> {
        let res = self
            .fetch_token(&TokenRequest {
                user_identity: name.to_string(),
                room_name: room.to_string(),
                passcode: passcode.to_string(),
                create_room: true,
                create_conversation: self.create_conversation,
            })
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let err = server_error(status, &body, None);
            tracing::warn!(status = %status, room = %room, error = %err, "Token fetch failed");
            return Err(match err {
                AuthError::Server { message, .. } if status == StatusCode::UNAUTHORIZED => {
                    AuthError::InvalidPasscode {
                        message: error_message(&message),
                    }
                }
                AuthError::Server {
                    message,
                    code,
                    status,
                } => AuthError::Server {
                    message: error_message(&message),
                    code,
                    status,
                },
                other => other,
            });
        }

        serde_json::from_str(&body).map_err(|e| AuthError::Server {
            message: format!("Invalid token response: {}", e),
            code: None,
            status: Some(status.as_u16()),
        })
    }

    pub async fn update_recording_rules(
        &self,
        room_sid: &str,
        rules: &[RecordingRule],
        passcode: &str,
    ) -> Result<Value, AuthError> {
        let res = self
            .http
            .post(self.recording_rules_url.clone())
            .json(&RecordingRulesRequest {
                room_sid,
                rules,
                passcode,
            })
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let err = server_error(status, &body, Some(RECORDING_RULES_FALLBACK));
            tracing::warn!(status = %status, room_sid = %room_sid, error = %err, "Recording rules update failed");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| AuthError::Server {
            message: format!("Invalid recording rules response: {}", e),
            code: None,
            status: Some(status.as_u16()),
        })
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

/// Build an error from a non-OK response: body message, then fallback, then status text.
fn server_error(status: StatusCode, body: &str, fallback: Option<&str>) -> AuthError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = envelope
        .message()
        .or(fallback)
        .unwrap_or_else(|| status_text(status))
        .to_string();

    AuthError::Server {
        message,
        code: envelope.code(),
        status: Some(status.as_u16()),
    }
}
