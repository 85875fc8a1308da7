use super::{escape_html, fill};
use crate::include_res;

/// Passcode form shown while no user is signed in
#[derive(Debug, Clone, Default)]
pub struct SignInScreen {
    error: Option<String>,
}

impl SignInScreen {
    pub fn new(error: Option<String>) -> Self {
        Self { error }
    }

    pub fn render(&self, action: &str) -> String {
        let error = self
            .error
            .as_deref()
            .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
            .unwrap_or_default();

        fill(
            include_res!(str, "/pages/sign_in.html"),
            &[("action", escape_html(action).as_str()), ("error", error.as_str())],
        )
    }
}
