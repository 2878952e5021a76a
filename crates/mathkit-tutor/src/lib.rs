//! MathKit Tutor
//!
//! Free-text tutoring feedback for the number line game, produced by an
//! OpenAI-compatible chat-completions API.
//!
//! The engines never wait on the tutor. A caller grades a move, hands
//! [`mathkit_core::MoveOutcome::tutor_prompt`] to [`TutorClient::feedback`]
//! and overwrites its feedback slot with whatever comes back. Failures are
//! turned into a message for the learner rather than an error.

mod client;

pub use client::TutorClient;

use thiserror::Error;

/// Shown when the API answers without any message content.
pub const EMPTY_FEEDBACK: &str = "Unable to generate feedback.";

/// Shown when the request fails for any reason.
pub const FAILED_FEEDBACK: &str = "There was an error retrieving feedback. Please try again.";

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum TutorError {
    /// No API key was found in the configured environment variable.
    #[error("no API key found in environment variable '{env}'")]
    MissingApiKey {
        /// Name of the environment variable that was checked.
        env: String,
    },

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },
}

impl TutorError {
    /// Returns `true` if retrying the same request later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::MissingApiKey { .. } => false,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// Result type for tutor operations.
pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TutorError::MissingApiKey {
            env: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no API key found in environment variable 'OPENAI_API_KEY'"
        );

        let err = TutorError::Api {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "API returned 401: bad key");
    }

    #[test]
    fn test_is_transient() {
        let rate_limited = TutorError::Api {
            status: 429,
            message: String::new(),
        };
        assert!(rate_limited.is_transient());

        let server = TutorError::Api {
            status: 503,
            message: String::new(),
        };
        assert!(server.is_transient());

        let auth = TutorError::Api {
            status: 401,
            message: String::new(),
        };
        assert!(!auth.is_transient());

        let missing = TutorError::MissingApiKey { env: "X".into() };
        assert!(!missing.is_transient());
    }
}
