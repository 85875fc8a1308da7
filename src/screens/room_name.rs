use super::{escape_html, fill};
use crate::include_res;
use crate::location::Location;

const READY_SUFFIX: &str = "! Whenever you're ready, hit Continue to go straight into the waiting room.";
const MISSING_MESSAGE: &str =
    "There was an issue getting either your Name or Room. Please go back and try again.";
const SUPPORT_MESSAGE: &str = "If this problem persists, please contact support.";

/// "Join a Room" confirmation screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomNameScreen {
    name: String,
    room_name: String,
    has_username: bool,
    has_room_name: bool,
}

impl RoomNameScreen {
    /// Build the screen, filling an empty name or room from the URL once.
    pub fn mount(
        name: impl Into<String>,
        room_name: impl Into<String>,
        signed_in: bool,
        location: &Location,
    ) -> Self {
        let mut name = name.into();
        let mut room_name = room_name.into();

        if room_name.is_empty() {
            if let Some(room) = location.room_name() {
                room_name = room.to_string();
            }
        }

        if name.is_empty() {
            if let Some(user) = location.user_name() {
                name = user.to_string();
            }
        }

        Self {
            has_username: location.has_user_name() || signed_in,
            has_room_name: location.has_room_name() || !room_name.is_empty(),
            name,
            room_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    /// Continue is enabled only with both a name and a room.
    pub fn can_submit(&self) -> bool {
        !self.name.is_empty() && !self.room_name.is_empty()
    }

    /// Whether both a user and a room are known to the page.
    pub fn is_complete(&self) -> bool {
        self.has_username && self.has_room_name
    }

    pub fn message(&self) -> String {
        if self.is_complete() {
            format!("Hello {}{}", capitalize(&self.name), READY_SUFFIX)
        } else {
            MISSING_MESSAGE.to_string()
        }
    }

    /// Render the screen; the form posts `name` and `roomName` to `action`.
    pub fn render(&self, action: &str) -> String {
        let support = if self.is_complete() {
            String::new()
        } else {
            format!("<p><br>{}</p>", SUPPORT_MESSAGE)
        };
        let disabled = if self.can_submit() { "" } else { " disabled" };

        fill(
            include_res!(str, "/pages/room_name.html"),
            &[
                ("message", escape_html(&self.message()).as_str()),
                ("support", support.as_str()),
                ("action", escape_html(action).as_str()),
                ("name", escape_html(&self.name).as_str()),
                ("room_name", escape_html(&self.room_name).as_str()),
                ("disabled", disabled),
            ],
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
