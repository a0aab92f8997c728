use thiserror::Error;

use restock_core::DomainError;

/// Shown whenever a failure carries no message of its own.
pub const GENERIC_FAILURE: &str = "Failed to connect to the AI model.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx answer; `message` is taken from the body when it has one.
    #[error("service error ({status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Service { status: u16, message: Option<String> },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("not available: {0}")]
    Unavailable(String),

    /// A request of the same kind is already outstanding.
    #[error("a {0} request is already in progress")]
    Busy(&'static str),

    /// The inventory was replaced while the request was in flight.
    #[error("inventory changed while the request was in flight")]
    Superseded,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl GatewayError {
    /// The single place where failures become user-facing text.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Service {
                message: Some(message),
                ..
            } => message.clone(),
            GatewayError::Service { message: None, .. } | GatewayError::Network(_) => {
                GENERIC_FAILURE.to_string()
            }
            GatewayError::Timeout => "The AI model did not respond in time.".to_string(),
            GatewayError::Decode(_) => "The AI model returned an unexpected response.".to_string(),
            GatewayError::Unavailable(what) => format!("Not available: {what}."),
            GatewayError::Busy(_) => "Please wait for the current request to finish.".to_string(),
            GatewayError::Superseded => {
                "Inventory was reloaded; please generate the order again.".to_string()
            }
            GatewayError::Domain(err) => err.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_message_is_surfaced_verbatim() {
        let err = GatewayError::Service {
            status: 500,
            message: Some("Model is not loaded".to_string()),
        };
        assert_eq!(err.user_message(), "Model is not loaded");
        assert_eq!(err.to_string(), "service error (500): Model is not loaded");
    }

    #[test]
    fn missing_message_falls_back() {
        let err = GatewayError::Service {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(GatewayError::Network("refused".into()).user_message(), GENERIC_FAILURE);
    }
}
