use reqwest::StatusCode;
use serde::Deserialize;

/// Everything that can go wrong between the core and the marketplace backend.
///
/// The variants follow the recovery rules the rest of the crate relies on:
/// `Validation` never reaches the network, `Unauthorized`/`NotFound` on
/// personal listings degrade to empty collections inside the HTTP client,
/// `Conflict` is the "offer already exists" signal the negotiation flow
/// treats as success, and the remaining variants surface to the user as a
/// transient notification.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected locally before any network call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing or expired session, or the backend answered 401/403.
    #[error("not signed in or not allowed")]
    Unauthorized,

    /// The backend answered 404.
    #[error("resource not found")]
    NotFound,

    /// The backend answered 409 (e.g. an offer already exists for this
    /// provider/request pair).
    #[error("conflicting resource state")]
    Conflict,

    /// The request never produced a usable response (DNS, TLS, timeout...).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other non-2xx answer, with whatever message the backend supplied.
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },
}

/// Error body shape the backend uses for non-2xx answers: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Map a non-success status code and raw body text to the taxonomy.
    pub fn from_status(status: StatusCode, body: &str) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::CONFLICT => ApiError::Conflict,
            _ => ApiError::Backend {
                status: status.as_u16(),
                message: extract_message(body),
            },
        }
    }

    /// Best human-readable text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Unauthorized => "You need to sign in to do that.".to_string(),
            ApiError::NotFound => "That item no longer exists.".to_string(),
            ApiError::Conflict => "You have already responded to this request.".to_string(),
            ApiError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Decode(_) => "The server sent an unexpected answer.".to_string(),
            ApiError::Backend { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Backend { status, .. } => format!("The server answered with error {status}."),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict)
    }

    /// True for the status codes personal listings recover from by
    /// substituting an empty collection.
    pub fn is_empty_listing(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::NotFound)
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw
/// text (trimmed) when the body is not the expected shape.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}
