//! Remote note service contract and its HTTP implementation.

mod dto;
mod http;

pub use dto::NoteDto;
pub use http::HttpNoteService;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::Credential;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote rejected the credential: {0}")]
    Unauthorized(String),
    #[error("Remote note not found: {0}")]
    NotFound(String),
    #[error("Remote API error: {message}")]
    Status { status: u16, message: String },
}

impl RemoteError {
    /// Whether the failure looks like missing connectivity rather than a server answer
    #[must_use]
    pub fn is_offline(&self) -> bool {
        match self {
            Self::Http(error) => error.is_connect() || error.is_timeout(),
            _ => false,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Network collaborator holding the authoritative note collection.
///
/// Every call takes the credential explicitly; implementations never look a
/// token up on their own. Implementations must bound each call with a
/// timeout so that no call blocks a sync pass indefinitely.
#[allow(async_fn_in_trait)]
pub trait RemoteNoteService {
    /// Fetch the complete remote collection in one call
    async fn list_notes(&self, credential: &Credential) -> RemoteResult<Vec<NoteDto>>;

    async fn get_note(&self, credential: &Credential, id: &str) -> RemoteResult<NoteDto>;

    /// Create a note and return the stored representation
    async fn create_note(&self, credential: &Credential, note: &NoteDto) -> RemoteResult<NoteDto>;

    /// Replace the note stored under `id`; only success matters
    async fn update_note(
        &self,
        credential: &Credential,
        id: &str,
        note: &NoteDto,
    ) -> RemoteResult<()>;

    async fn delete_note(&self, credential: &Credential, id: &str) -> RemoteResult<()>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.error.or(payload.message) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

/// Map a non-success response onto the error taxonomy.
pub(crate) fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let message = parse_api_error(status, body);
    match status {
        StatusCode::UNAUTHORIZED => RemoteError::Unauthorized(message),
        StatusCode::NOT_FOUND => RemoteError::NotFound(message),
        _ => RemoteError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_api_error_prefers_error_field() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_REQUEST, r#"{"error":" Title is required "}"#),
            "Title is required (400)"
        );
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, r#"{"message":"upstream down"}"#),
            "upstream down (502)"
        );
    }

    #[test]
    fn parse_api_error_falls_back_to_body_or_status() {
        assert_eq!(
            parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "boom (500)"
        );
        assert_eq!(
            parse_api_error(StatusCode::SERVICE_UNAVAILABLE, "  "),
            "HTTP 503"
        );
    }

    #[test]
    fn status_error_classifies_auth_and_missing() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, r#"{"error":"Token expired"}"#),
            RemoteError::Unauthorized(message) if message == "Token expired (401)"
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            RemoteError::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::CONFLICT, ""),
            RemoteError::Status { status: 409, .. }
        ));
    }

    #[test]
    fn non_transport_errors_are_not_offline() {
        assert!(!RemoteError::NotFound("x".to_string()).is_offline());
        assert!(!RemoteError::Status {
            status: 500,
            message: "x".to_string()
        }
        .is_offline());
    }
}
