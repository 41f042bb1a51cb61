//! Error taxonomy for dashboard actions.
//!
//! Every variant is recoverable and local to the action that raised it. The
//! carried string is the message shown to the user; transport detail is only
//! ever logged.

use crate::services::notices::NoticeKind;

/// Failure of a single user-triggered action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashError {
    /// Bad file type or a missing column selection. No request is sent.
    #[error("{0}")]
    Validation(String),
    /// The backend answered with an `error` field.
    #[error("{0}")]
    Server(String),
    /// Network or decode failure.
    #[error("{0}")]
    Transport(String),
    /// A download was requested for something that is not rendered.
    #[error("{0}")]
    NotFound(String),
}

impl DashError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// User-facing message
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Server(m) | Self::Transport(m) | Self::NotFound(m) => m,
        }
    }

    /// Category used by the message channel
    pub fn kind(&self) -> NoticeKind {
        match self {
            Self::Validation(_) => NoticeKind::Validation,
            Self::Server(_) => NoticeKind::Server,
            Self::Transport(_) => NoticeKind::Transport,
            Self::NotFound(_) => NoticeKind::NotFound,
        }
    }
}

pub type DashResult<T> = std::result::Result<T, DashError>;
