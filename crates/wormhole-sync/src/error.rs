use crate::clipboard::ClipboardError;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use wormhole_core::{ApiError, Operation, ShortCode};

/// User actions that can fail visibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shorten,
    Stats,
    Update,
    Delete,
    Copy,
}

impl Action {
    /// The message shown to the user when this action fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Shorten => "Failed to shorten URL. Please check the URL and try again.",
            Action::Stats => "Failed to fetch URL statistics.",
            Action::Update => "Failed to update URL.",
            Action::Delete => "Failed to delete URL.",
            Action::Copy => "Failed to copy to clipboard",
        }
    }

    /// The action a failed remote operation belongs to. Lookups back the
    /// search box and have none.
    pub fn for_operation(operation: Operation) -> Option<Self> {
        match operation {
            Operation::Create => Some(Action::Shorten),
            Operation::Stats => Some(Action::Stats),
            Operation::Update => Some(Action::Update),
            Operation::Delete => Some(Action::Delete),
            Operation::Lookup => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// The message shown for the most recent failure, shared between the
/// session and its search resolver.
pub type ErrorSlot = Arc<Mutex<Option<String>>>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Request(#[from] ApiError),
    #[error("short code {0} is not in the local cache")]
    UnknownRecord(ShortCode),
    #[error("no edit in progress")]
    NoEditSession,
    #[error("a mutation for {0} is already in flight")]
    InFlight(ShortCode),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl SessionError {
    /// The action this failure is reported under, if it is user-visible.
    pub fn action(&self) -> Option<Action> {
        match self {
            SessionError::InvalidUrl(_) => Some(Action::Shorten),
            SessionError::Request(err) => Action::for_operation(err.operation()),
            SessionError::Clipboard(_) => Some(Action::Copy),
            SessionError::UnknownRecord(_)
            | SessionError::NoEditSession
            | SessionError::InFlight(_) => None,
        }
    }

    pub fn user_message(&self) -> Option<&'static str> {
        self.action().map(|action| action.failure_message())
    }
}
