use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Upper bound on the response-body excerpt carried inside decode errors.
const BODY_EXCERPT_MAX: usize = 512;

#[derive(Debug, Error)]
pub enum CloudBaseError {
    #[error("app code is required")]
    MissingAppCode,

    #[error("transport failure: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("failed to encode request payload as JSON: {source}")]
    EncodePayload {
        #[source]
        source: serde_json::Error,
    },

    #[error("response for '{action}' (HTTP {status}) is not valid JSON: {source}; body: {body}")]
    ResponseNotJson {
        action: String,
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response for '{action}' (HTTP {status}) is not a JSON object; body: {body}")]
    ResponseNotObject {
        action: String,
        status: StatusCode,
        body: String,
    },

    #[error("response (HTTP {status}) is missing the '{action}' action key")]
    MissingActionKey { action: String, status: StatusCode },

    #[error("result under '{action}' (HTTP {status}) is not a JSON object")]
    ActionNotObject { action: String, status: StatusCode },

    #[error("device registration returned no usable session id (HTTP {status})")]
    MissingSessionId { status: StatusCode },

    #[error("failed to read attachment '{field}' from {path}: {source}")]
    Attachment {
        field: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "retry budget exhausted after {attempts} attempts (status: {status:?}, last error: {last_error:?})"
    )]
    RetryExhausted {
        attempts: u32,
        status: Option<StatusCode>,
        last_error: Option<String>,
    },
}

impl CloudBaseError {
    #[must_use]
    pub fn attachment(field: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Attachment {
            field: field.into(),
            path: path.into(),
            source,
        }
    }

    pub(crate) fn encode(source: serde_json::Error) -> Self {
        Self::EncodePayload { source }
    }
}

/// Bounded, lossy rendering of a response body for error context.
pub(crate) fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= BODY_EXCERPT_MAX {
        return text.into_owned();
    }
    let mut excerpt: String = text.chars().take(BODY_EXCERPT_MAX).collect();
    excerpt.push_str("...");
    excerpt
}
