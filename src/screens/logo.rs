use super::escape_html;

pub const LOGO_ALT: &str = "dynacare-logo";

/// Brand image pinned to the top-left corner of every pre-join page
#[derive(Debug, Clone)]
pub struct Logo {
    src: String,
}

impl Logo {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn render(&self) -> String {
        format!(
            r#"<img class="logo" alt="{}" src="{}">"#,
            LOGO_ALT,
            escape_html(&self.src)
        )
    }
}
