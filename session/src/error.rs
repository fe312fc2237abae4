//! Request-layer errors and their user-facing messages.
//!
//! ERROR HANDLING
//! ==============
//! [`ApiError`] is what every request helper returns. UI call sites turn it
//! into text with [`user_message`]; they never match on transport details.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::types::ApiErrorBody;

/// Failure of a request made through [`AuthApi`](crate::api::AuthApi).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, CORS, offline).
    #[error("network error: {0}")]
    Network(String),
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status {
        status: u16,
        body: Option<ApiErrorBody>,
    },
    /// The server answered 2xx but the body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The server answered 2xx with `success: false`.
    #[error("request rejected: {message}")]
    Rejected { message: String, errors: Vec<String> },
    /// The returned access token lacks the claims needed to build a user.
    #[error("access token is missing required claims")]
    InvalidToken,
    /// The request could not be built locally (no stored tokens, bad body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout => ErrorKind::Timeout,
            Self::Status { status, .. } => ErrorKind::from_status(*status),
            Self::Rejected { .. } => ErrorKind::BadRequest,
            Self::InvalidToken => ErrorKind::Unauthorized,
            Self::Decode(_) | Self::InvalidRequest(_) => ErrorKind::Unknown,
        }
    }
}

/// Coarse buckets used to pick a fallback message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
    Unauthorized,
    Forbidden,
    NotFound,
    BadRequest,
    Timeout,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Default message shown when the server gave no detail.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Network => "Unable to reach the server. Please check your internet connection.",
            Self::Server => "The server ran into a problem. Please try again later.",
            Self::Unauthorized => "Your session has expired. Please sign in again.",
            Self::Forbidden => "You do not have permission to access this resource.",
            Self::NotFound => "The requested resource was not found.",
            Self::BadRequest => "The submitted data is not valid.",
            Self::Timeout => "The request timed out. Please try again.",
            Self::Unknown => "An unknown error occurred. Please try again.",
        }
    }
}

/// Message to show the user for `error`.
///
/// Server-provided `errors` (joined by newlines) win over the server
/// `message`, which wins over the bucket default.
#[must_use]
pub fn user_message(error: &ApiError) -> String {
    let (message, errors) = match error {
        ApiError::Status { body: Some(body), .. } => (body.message.as_str(), body.errors.as_slice()),
        ApiError::Rejected { message, errors } => (message.as_str(), errors.as_slice()),
        _ => ("", &[][..]),
    };
    if !errors.is_empty() {
        return errors.join("\n");
    }
    if !message.is_empty() {
        return message.to_owned();
    }
    error.kind().default_message().to_owned()
}

#[must_use]
pub fn is_auth_error(error: &ApiError) -> bool {
    error.status() == Some(401)
}

#[must_use]
pub fn is_forbidden(error: &ApiError) -> bool {
    error.status() == Some(403)
}

#[must_use]
pub fn is_not_found(error: &ApiError) -> bool {
    error.status() == Some(404)
}

#[must_use]
pub fn is_server_error(error: &ApiError) -> bool {
    error.status().is_some_and(|s| (500..600).contains(&s))
}

#[must_use]
pub fn is_network_error(error: &ApiError) -> bool {
    matches!(error, ApiError::Network(_))
}
