pub mod client;

pub use client::TokenClient;

use std::sync::Arc;

use serde_json::Value;

use crate::error::AuthError;
use crate::location::Location;
use crate::models::{AuthReadiness, RecordingRule, TokenResponse, User, VerificationResult};
use crate::storage::{SessionStorage, DISPLAY_NAME_KEY, PASSCODE_KEY, ROOM_NAME_KEY};

/// Translate known backend error codes into user-facing text.
pub fn error_message(message: &str) -> String {
    match message {
        "passcode incorrect" => "Passcode is incorrect".to_string(),
        "passcode expired" => "Passcode has expired".to_string(),
        other => other.to_string(),
    }
}

/// Passcode from the URL, else from session storage.
pub fn resolve_passcode(location: &Location, storage: &impl SessionStorage) -> Option<String> {
    location
        .passcode()
        .map(str::to_string)
        .or_else(|| storage.get(PASSCODE_KEY).filter(|p| !p.is_empty()))
}

/// What the page should do with its address after initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    /// Replace the visible URL with this path (query stripped)
    Replace(String),
}

/// Passcode authentication state for one page load.
///
/// Built fresh per page load over the browser's storage; `initialize` performs
/// silent re-authentication and moves the session to `Ready` exactly once.
pub struct PasscodeAuth<S> {
    client: Arc<TokenClient>,
    storage: S,
    user: Option<User>,
    room_name: String,
    readiness: AuthReadiness,
}

impl<S: SessionStorage> PasscodeAuth<S> {
    pub fn new(client: Arc<TokenClient>, storage: S) -> Self {
        Self {
            client,
            storage,
            user: None,
            room_name: String::new(),
            readiness: AuthReadiness::NotReady,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn readiness(&self) -> AuthReadiness {
        self.readiness
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == AuthReadiness::Ready
    }

    /// Restore a session from the URL or storage without user interaction.
    ///
    /// Verification failures are not surfaced: the session simply ends up
    /// ready and signed out.
    pub async fn initialize(&mut self, location: &Location) -> Navigation {
        if self.is_ready() {
            return Navigation::Stay;
        }

        let passcode = resolve_passcode(location, &self.storage);
        let display_name = location
            .user_name()
            .map(str::to_string)
            .or_else(|| self.storage.get(DISPLAY_NAME_KEY))
            .unwrap_or_default();
        let room_name = location
            .room_name()
            .map(str::to_string)
            .or_else(|| self.storage.get(ROOM_NAME_KEY))
            .unwrap_or_default();

        let mut navigation = Navigation::Stay;

        if let Some(passcode) = passcode {
            match self.client.verify(&passcode).await {
                Ok(VerificationResult::Valid) => {
                    self.storage.set(PASSCODE_KEY, &passcode);
                    self.storage.set(DISPLAY_NAME_KEY, &display_name);
                    self.storage.set(ROOM_NAME_KEY, &room_name);

                    tracing::info!(room = %room_name, "Session restored");
                    self.user = Some(User::new(display_name, passcode));
                    self.room_name = room_name;

                    // Keep the passcode out of the address bar.
                    if location.has_query() {
                        navigation = Navigation::Replace(location.path().to_string());
                    }
                }
                Ok(VerificationResult::Invalid(message)) => {
                    tracing::debug!(reason = %message, "Stored passcode rejected");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Silent re-authentication failed");
                }
            }
        }

        self.readiness = AuthReadiness::Ready;
        navigation
    }

    pub async fn sign_in(&mut self, passcode: &str) -> Result<(), AuthError> {
        match self.client.verify(passcode).await {
            Ok(VerificationResult::Valid) => {
                self.storage.set(PASSCODE_KEY, passcode);
                self.user = Some(User::new("", passcode));
                tracing::info!("Signed in with passcode");
                Ok(())
            }
            Ok(VerificationResult::Invalid(message)) => Err(AuthError::InvalidPasscode {
                message: error_message(&message),
            }),
            Err(AuthError::Server {
                message,
                code,
                status,
            }) => Err(AuthError::Server {
                message: error_message(&message),
                code,
                status,
            }),
            Err(e) => Err(e),
        }
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.room_name.clear();
        self.storage.clear();
        tracing::info!("Signed out");
    }

    /// Token for joining `room` as `name`; needs a verified passcode.
    pub async fn fetch_session_token(
        &self,
        name: &str,
        room: &str,
    ) -> Result<TokenResponse, AuthError> {
        let user = self.user.as_ref().ok_or(AuthError::NotSignedIn)?;
        self.client
            .fetch_session_token(name, room, &user.passcode)
            .await
    }

    pub async fn update_recording_rules(
        &self,
        room_sid: &str,
        rules: &[RecordingRule],
    ) -> Result<Value, AuthError> {
        let user = self.user.as_ref().ok_or(AuthError::NotSignedIn)?;
        self.client
            .update_recording_rules(room_sid, rules, &user.passcode)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::models::RuleType;
    use crate::storage::MemoryStorage;
    use crate::test_support::{spawn_backend, MockBackend};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn auth_for(backend: &MockBackend, storage: MemoryStorage) -> PasscodeAuth<MemoryStorage> {
        let client = TokenClient::new(&test_config(&backend.url)).expect("Should build client");
        PasscodeAuth::new(Arc::new(client), storage)
    }

    #[test]
    fn test_error_message_table() {
        assert_eq!(error_message("passcode incorrect"), "Passcode is incorrect");
        assert_eq!(error_message("passcode expired"), "Passcode has expired");
        assert_eq!(error_message("room is full"), "room is full");
    }

    #[test]
    fn test_resolve_passcode_prefers_url() {
        let storage = MemoryStorage::new();
        storage.set(PASSCODE_KEY, "stored");

        let from_url = resolve_passcode(&Location::new("/", Some("passcode=url")), &storage);
        let from_storage = resolve_passcode(&Location::new("/", None), &storage);

        assert_eq!(from_url.as_deref(), Some("url"));
        assert_eq!(from_storage.as_deref(), Some("stored"));
        assert_eq!(
            resolve_passcode(&Location::default(), &MemoryStorage::new()),
            None
        );
    }

    #[tokio::test]
    async fn test_sign_in_stores_passcode() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        let mut auth = auth_for(&backend, storage.clone());

        auth.sign_in("validcode").await.expect("Should sign in");

        assert_eq!(storage.get(PASSCODE_KEY).as_deref(), Some("validcode"));
        assert_eq!(auth.user(), Some(&User::new("", "validcode")));
    }

    #[tokio::test]
    async fn test_sign_in_with_wrong_passcode() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        let mut auth = auth_for(&backend, storage.clone());

        let err = auth.sign_in("wrongcode").await.expect_err("Should fail");

        assert_eq!(
            err,
            AuthError::InvalidPasscode {
                message: "Passcode is incorrect".to_string()
            }
        );
        assert!(auth.user().is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_with_ok_response_but_no_token() {
        let backend = spawn_backend().await;
        let mut auth = auth_for(&backend, MemoryStorage::new());

        let result = auth.sign_in("notoken").await;

        assert!(matches!(result, Err(AuthError::Server { .. })));
        assert!(auth.user().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        let mut auth = auth_for(&backend, storage.clone());
        auth.initialize(&Location::new(
            "/",
            Some("passcode=validcode&roomName=standup&userName=ana"),
        ))
        .await;
        assert_eq!(storage.len(), 3);

        auth.sign_out();

        assert!(auth.user().is_none());
        assert_eq!(auth.room_name(), "");
        assert_eq!(storage.get(PASSCODE_KEY), None);
        assert_eq!(storage.get(DISPLAY_NAME_KEY), None);
        assert_eq!(storage.get(ROOM_NAME_KEY), None);
        assert!(auth.is_ready());
    }

    #[tokio::test]
    async fn test_initialize_from_url_rehydrates_and_strips_query() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        let mut auth = auth_for(&backend, storage.clone());
        assert_eq!(auth.readiness(), AuthReadiness::NotReady);

        let navigation = auth
            .initialize(&Location::new(
                "/room",
                Some("passcode=validcode&roomName=standup&user=ana"),
            ))
            .await;

        assert_eq!(navigation, Navigation::Replace("/room".to_string()));
        assert!(auth.is_ready());
        assert_eq!(auth.user(), Some(&User::new("ana", "validcode")));
        assert_eq!(auth.room_name(), "standup");
        assert_eq!(storage.get(DISPLAY_NAME_KEY).as_deref(), Some("ana"));
        assert_eq!(storage.get(ROOM_NAME_KEY).as_deref(), Some("standup"));
    }

    #[tokio::test]
    async fn test_initialize_from_storage() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        storage.set(PASSCODE_KEY, "validcode");
        storage.set(DISPLAY_NAME_KEY, "ana");
        storage.set(ROOM_NAME_KEY, "standup");
        let mut auth = auth_for(&backend, storage.clone());

        let navigation = auth.initialize(&Location::new("/", None)).await;

        assert_eq!(navigation, Navigation::Stay);
        assert!(auth.is_ready());
        assert_eq!(auth.user(), Some(&User::new("ana", "validcode")));
        assert_eq!(auth.room_name(), "standup");
    }

    #[tokio::test]
    async fn test_initialize_with_stored_passcode_and_query_replaces_url() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        storage.set(PASSCODE_KEY, "validcode");
        let mut auth = auth_for(&backend, storage);

        let navigation = auth
            .initialize(&Location::new("/", Some("roomName=standup")))
            .await;

        assert_eq!(navigation, Navigation::Replace("/".to_string()));
        assert_eq!(auth.room_name(), "standup");
    }

    #[tokio::test]
    async fn test_initialize_without_passcode_is_ready_immediately() {
        let backend = spawn_backend().await;
        let mut auth = auth_for(&backend, MemoryStorage::new());

        let navigation = auth
            .initialize(&Location::new("/", Some("roomName=standup")))
            .await;

        assert_eq!(navigation, Navigation::Stay);
        assert!(auth.is_ready());
        assert!(auth.user().is_none());
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_swallows_rejected_passcode() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        let mut auth = auth_for(&backend, storage.clone());

        let navigation = auth
            .initialize(&Location::new("/", Some("passcode=expiredcode")))
            .await;

        assert_eq!(navigation, Navigation::Stay);
        assert!(auth.is_ready());
        assert!(auth.user().is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let backend = spawn_backend().await;
        let mut auth = auth_for(&backend, MemoryStorage::new());
        auth.initialize(&Location::default()).await;

        let navigation = auth
            .initialize(&Location::new("/", Some("passcode=validcode")))
            .await;

        assert_eq!(navigation, Navigation::Stay);
        assert!(auth.user().is_none());
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_session_token_requires_sign_in() {
        let backend = spawn_backend().await;
        let auth = auth_for(&backend, MemoryStorage::new());

        let result = auth.fetch_session_token("ana", "standup").await;

        assert_eq!(result, Err(AuthError::NotSignedIn));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_session_token_uses_verified_passcode() {
        let backend = spawn_backend().await;
        let mut auth = auth_for(&backend, MemoryStorage::new());
        auth.sign_in("validcode").await.expect("Should sign in");

        let token = auth
            .fetch_session_token("ana", "standup")
            .await
            .expect("Should fetch token");

        assert_eq!(token.token, "t");
        let (_, body) = backend.last_request().expect("Should record request");
        assert_eq!(body["passcode"], "validcode");
    }

    #[tokio::test]
    async fn test_update_recording_rules_requires_sign_in() {
        let backend = spawn_backend().await;
        let auth = auth_for(&backend, MemoryStorage::new());
        let rules = [RecordingRule {
            rule_type: RuleType::Include,
            all: Some(true),
            publisher: None,
            kind: None,
        }];

        let result = auth.update_recording_rules("RM123", &rules).await;

        assert_eq!(result, Err(AuthError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_dropped_sign_in_leaves_storage_untouched() {
        let backend = spawn_backend().await;
        let storage = MemoryStorage::new();
        let mut auth = auth_for(&backend, storage.clone());

        let result =
            tokio::time::timeout(Duration::from_millis(100), auth.sign_in("slowcode")).await;

        assert!(result.is_err());
        assert!(auth.user().is_none());
        assert!(storage.is_empty());
    }
}
