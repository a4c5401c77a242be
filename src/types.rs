// Error taxonomy shared by the parser, gateway and session

use std::time::Duration;

/// Message shown when the analysis backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error: Cannot connect to the backend server. \
     Please make sure the analysis server is running.";

pub const TIMEOUT_MESSAGE: &str = "Request timed out. The server took too long to respond.";

pub const NOT_FOUND_MESSAGE: &str =
    "API endpoint not found. The backend might be misconfigured.";

pub const SERVER_FAULT_MESSAGE: &str =
    "Server error. The backend encountered an internal problem.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Backend unreachable: {0}")]
    Connectivity(String),

    #[error("Request timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("Endpoint not found: {0}")]
    NotFound(String),

    #[error("Server fault ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Server error: {status} - {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No file selected")]
    NoActiveFile,

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Human-readable text for the history panel and status line.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UnsupportedFormat(msg) => msg.clone(),
            AppError::Parse(msg) => format!("Error parsing file: {}", msg),
            AppError::Connectivity(_) => NETWORK_ERROR_MESSAGE.to_string(),
            AppError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            AppError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            AppError::Server { .. } => SERVER_FAULT_MESSAGE.to_string(),
            AppError::Remote { .. } | AppError::InvalidResponse(_) => format!("Error: {}", self),
            AppError::NoActiveFile => "Please upload and select a file to analyze.".to_string(),
            AppError::EmptyPrompt => "Please enter a question about your data.".to_string(),
            AppError::Io(e) => format!("Error reading file: {}", e),
        }
    }

    /// Classify a non-success HTTP status into the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => AppError::NotFound(message),
            500..=599 => AppError::Server { status, message },
            _ => AppError::Remote { status, message },
        }
    }

    /// Classify a transport-level failure from the HTTP client.
    pub fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AppError::Timeout(timeout)
        } else if let Some(status) = err.status() {
            AppError::from_status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            AppError::InvalidResponse(err.to_string())
        } else {
            AppError::Connectivity(err.to_string())
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(AppError::from_status(404, "missing"), AppError::NotFound(_)));
        assert!(matches!(
            AppError::from_status(500, "boom"),
            AppError::Server { status: 500, .. }
        ));
        assert!(matches!(
            AppError::from_status(503, "down"),
            AppError::Server { status: 503, .. }
        ));
        assert!(matches!(
            AppError::from_status(400, "bad"),
            AppError::Remote { status: 400, .. }
        ));
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let messages = [
            AppError::Connectivity("refused".into()).user_message(),
            AppError::Timeout(Duration::from_secs(10)).user_message(),
            AppError::NotFound("/api/analyze".into()).user_message(),
            AppError::Server { status: 500, message: "x".into() }.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_remote_error_surfaces_status() {
        let err = AppError::from_status(422, "No prompt provided");
        assert_eq!(
            err.user_message(),
            "Error: Server error: 422 - No prompt provided"
        );
    }
}
