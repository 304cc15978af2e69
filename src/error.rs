//! Error types shared by the API client, the list controller and the forms

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Server error (status {status}): {message}")]
    Server {
        status: u16,
        message: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("No authentication token found. Run 'infludash login' first")]
    MissingToken,

    #[error("Credential store error: {0}")]
    Credentials(String),
}

impl ApiError {
    /// Text suitable for a banner or inline error line
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Credentials(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Server {
            status: 400,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.user_message(), "Email already registered");
        assert_eq!(
            err.to_string(),
            "Server error (status 400): Email already registered"
        );
    }

    #[test]
    fn test_validation_message_is_plain() {
        let err = ApiError::Validation("GST cannot exceed 100%".to_string());
        assert_eq!(err.user_message(), "GST cannot exceed 100%");
        assert!(!err.is_not_found());
        assert!(ApiError::NotFound("/queries/1".to_string()).is_not_found());
    }
}
