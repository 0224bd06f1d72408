//! Hash-style routes: `/admin`, `/chat/{id}`, `/share/{token}`.

use std::fmt;

/// A destination in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Admin,
    Chat { session_id: String },
    Share { token: String },
}

impl Route {
    /// Parses a bare path (`/chat/x`), a hash path (`#/chat/x`) or a full URL
    /// carrying the route in its fragment.
    ///
    /// `/` and the empty path map to `Admin`. Anything else unknown is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let path = match input.split_once('#') {
            Some((_, fragment)) => fragment,
            None if input.contains("://") => return Some(Self::Admin),
            None => input,
        };
        let path = path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["admin"] => Some(Self::Admin),
            ["chat", session_id] => Some(Self::Chat {
                session_id: (*session_id).to_string(),
            }),
            ["share", token] => Some(Self::Share {
                token: (*token).to_string(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "/admin"),
            Self::Chat { session_id } => write!(f, "/chat/{session_id}"),
            Self::Share { token } => write!(f, "/share/{token}"),
        }
    }
}

/// Where opening a route ended up, plus anything the user should be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub notice: Option<String>,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self {
            route,
            notice: None,
        }
    }

    pub fn with_notice(route: Route, notice: impl Into<String>) -> Self {
        Self {
            route,
            notice: Some(notice.into()),
        }
    }
}
