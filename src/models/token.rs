use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body sent to the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRequest {
    pub user_identity: String,
    pub room_name: String,
    pub passcode: String,
    pub create_room: bool,
    pub create_conversation: bool,
}

/// Token returned by the backend. Room metadata is forwarded untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of a passcode check against the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Valid,
    Invalid(String),
}

/// Single recording rule, as understood by the rules endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordingRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Include,
    Exclude,
}

/// Body sent to the recording rules endpoint
#[derive(Debug, Serialize)]
pub struct RecordingRulesRequest<'a> {
    pub room_sid: &'a str,
    pub rules: &'a [RecordingRule],
    pub passcode: &'a str,
}

/// Error envelope used by the backend: `{ "error": { "message", "code" } }`
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<ErrorCode>,
}

/// Backend codes arrive as numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{}", n),
            ErrorCode::Text(s) => f.write_str(s),
        }
    }
}

impl ErrorEnvelope {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
    }

    pub fn code(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(|e| e.code.as_ref())
            .map(ToString::to_string)
    }
}
