use api::ApiError;
use dioxus::prelude::*;

/// User-facing failure categories. Views only ever show `message()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Network,
    BadResponse,
    NotFound,
    SessionExpired,
    /// Text the server chose to show the user.
    Server(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::Network => "Could not reach the server. Check your connection.",
            ViewError::BadResponse => "The server sent an unexpected response.",
            ViewError::NotFound => "Not found.",
            ViewError::SessionExpired => "Your session has expired. Please sign in again.",
            ViewError::Server(message) => message,
        }
    }
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized => ViewError::SessionExpired,
            ApiError::NotFound => ViewError::NotFound,
            ApiError::Transport(_) => ViewError::Network,
            ApiError::Decode(_) => ViewError::BadResponse,
            ApiError::Rejected { message, .. } => ViewError::Server(message.clone()),
            _ => ViewError::Unknown,
        }
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        ViewError::from(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
