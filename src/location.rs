//! Current page location: path plus decoded query parameters.

use axum::http::Uri;

pub const PASSCODE_PARAM: &str = "passcode";
pub const ROOM_NAME_PARAM: &str = "roomName";
pub const USER_NAME_PARAM: &str = "userName";
pub const USER_PARAM: &str = "user";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>, query: Option<&str>) -> Self {
        let query = query
            .map(|q| {
                url::form_urlencoded::parse(q.trim_start_matches('?').as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            path: path.into(),
            query,
        }
    }

    pub fn from_uri(uri: &Uri) -> Self {
        Self::new(uri.path(), uri.query())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// First non-empty value of a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Whether the parameter appears in the query at all, even empty.
    pub fn has_param(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn passcode(&self) -> Option<&str> {
        self.param(PASSCODE_PARAM)
    }

    pub fn room_name(&self) -> Option<&str> {
        self.param(ROOM_NAME_PARAM)
    }

    /// `userName` wins over the legacy `user` parameter.
    pub fn user_name(&self) -> Option<&str> {
        self.param(USER_NAME_PARAM).or_else(|| self.param(USER_PARAM))
    }

    pub fn has_user_name(&self) -> bool {
        self.has_param(USER_NAME_PARAM) || self.has_param(USER_PARAM)
    }

    pub fn has_room_name(&self) -> bool {
        self.has_param(ROOM_NAME_PARAM)
    }

    /// Query string with the passcode removed, re-encoded. Empty when nothing is left.
    pub fn query_without_passcode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query.iter().filter(|(k, _)| k != PASSCODE_PARAM) {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// `target` with this location's query (minus the passcode) appended.
    pub fn carry_to(&self, target: &str) -> String {
        let query = self.query_without_passcode();
        if query.is_empty() {
            target.to_string()
        } else {
            format!("{}?{}", target, query)
        }
    }
}
