use std::sync::Arc;

use crate::auth::TokenClient;
use crate::config::Config;
use crate::storage::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenClient>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config, tokens: TokenClient) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}
