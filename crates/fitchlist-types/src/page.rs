use serde::{Deserialize, Serialize};
use std::fmt;

use crate::view::{Filters, SortField, ViewState};

/// One page of a remote list. Replaces the previously displayed page wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Arguments handed to a page fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub page: u64,
    pub per_page: u64,
    pub query: String,
    pub sort: Vec<SortField>,
    pub filters: Filters,
}

impl From<&ViewState> for FetchRequest {
    fn from(state: &ViewState) -> Self {
        Self {
            page: state.pagination.current,
            per_page: state.pagination.page_size,
            query: state.search_term.clone(),
            sort: state.sort.clone(),
            filters: state.filters.clone(),
        }
    }
}

/// Where a fetch failed before it was normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Connection refused, timeout, non-success HTTP status
    Transport,
    /// 2xx response whose envelope carries a failure flag
    Server,
    /// 2xx payload could not be decoded
    Parse,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Transport => write!(f, "transport"),
            FetchErrorKind::Server => write!(f, "server"),
            FetchErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Uniform failure shape every fetcher reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Server,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Parse,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SortField;

    #[test]
    fn test_fetch_request_from_view_state() {
        let mut state = ViewState::new();
        state.search_term = "intro".to_string();
        state.sort = vec![SortField::ascend("code")];
        state.pagination.current = 3;
        state.pagination.page_size = 10;

        let request = FetchRequest::from(&state);
        assert_eq!(request.page, 3);
        assert_eq!(request.per_page, 10);
        assert_eq!(request.query, "intro");
        assert_eq!(request.sort, vec![SortField::ascend("code")]);
    }

    #[test]
    fn test_fetch_error_displays_message_only() {
        let err = FetchError::server("Invalid field used for sorting");
        assert_eq!(err.to_string(), "Invalid field used for sorting");
        assert_eq!(err.kind, FetchErrorKind::Server);
    }
}
