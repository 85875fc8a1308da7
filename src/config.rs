use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_LOGO_URL: &str =
    "https://hc365data.s3.amazonaws.com/logos/dynacare-full-logo-sm.png";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub backend_url: String,
    pub token_endpoint: String,
    pub recording_rules_endpoint: String,
    pub disable_conversations: bool,
    pub logo_url: String,
    pub request_timeout_ms: u64,
    pub cookie_secure: bool,
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            backend_url: env::var("TOKEN_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            token_endpoint: env::var("TOKEN_ENDPOINT").unwrap_or_else(|_| "/token".to_string()),
            recording_rules_endpoint: env::var("RECORDING_RULES_ENDPOINT")
                .unwrap_or_else(|_| "/recordingrules".to_string()),
            // Only the literal "true" disables conversations.
            disable_conversations: env::var("DISABLE_CONVERSATIONS")
                .map(|v| v == "true")
                .unwrap_or(false),
            logo_url: env::var("LOGO_URL").unwrap_or_else(|_| DEFAULT_LOGO_URL.to_string()),
            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10000),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            session_idle_secs: env::var("SESSION_IDLE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Absolute URL of the token endpoint.
    pub fn token_url(&self) -> Result<Url, ConfigError> {
        self.resolve(&self.token_endpoint)
    }

    /// Absolute URL of the recording rules endpoint.
    pub fn recording_rules_url(&self) -> Result<Url, ConfigError> {
        self.resolve(&self.recording_rules_endpoint)
    }

    // Endpoints may be full URLs or paths relative to the backend.
    fn resolve(&self, endpoint: &str) -> Result<Url, ConfigError> {
        if let Ok(url) = Url::parse(endpoint) {
            return Ok(url);
        }

        Url::parse(&self.backend_url)
            .and_then(|base| base.join(endpoint))
            .map_err(|_| ConfigError::InvalidEndpoint(endpoint.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("Invalid backend endpoint: {0}")]
    InvalidEndpoint(String),
}

#[cfg(test)]
pub(crate) fn test_config(backend_url: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        backend_url: backend_url.to_string(),
        token_endpoint: "/token".to_string(),
        recording_rules_endpoint: "/recordingrules".to_string(),
        disable_conversations: false,
        logo_url: DEFAULT_LOGO_URL.to_string(),
        request_timeout_ms: 2000,
        cookie_secure: false,
        session_idle_secs: 3600,
    }
}
