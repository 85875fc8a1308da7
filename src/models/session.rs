use serde::{Deserialize, Serialize};

/// Signed-in user. Fields are always present; an unknown display name is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub display_name: String,
    pub passcode: String,
}

impl User {
    pub fn new(display_name: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            passcode: passcode.into(),
        }
    }
}

/// Readiness of an authentication session. `Ready` is reached once per page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthReadiness {
    #[default]
    NotReady,
    Ready,
}
