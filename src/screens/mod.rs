//! Server-rendered pre-join screens.

pub mod logo;
pub mod room_name;
pub mod sign_in;

pub use logo::Logo;
pub use room_name::RoomNameScreen;
pub use sign_in::SignInScreen;

use crate::include_res;

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Substitute `{key}` placeholders in a single pass.
///
/// Substituted values are never rescanned, and unknown `{...}` runs are kept.
pub(crate) fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let value = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end))
        });

        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Wrap screen content in the shared page layout.
pub fn page(title: &str, logo: &Logo, content: &str) -> String {
    fill(
        include_res!(str, "/pages/layout.html"),
        &[
            ("title", escape_html(title).as_str()),
            ("logo", logo.render().as_str()),
            ("content", content),
        ],
    )
}
