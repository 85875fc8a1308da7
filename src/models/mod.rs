pub mod session;
pub mod token;

pub use session::{AuthReadiness, User};
pub use token::{
    ErrorEnvelope, RecordingRule, RecordingRulesRequest, RuleType, TokenRequest, TokenResponse,
    VerificationResult,
};
