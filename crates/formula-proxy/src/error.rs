//! Proxy error types and their HTTP rendering.

use crate::types::ErrorResponse;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Message sent to callers for failures whose detail stays server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed completion: {0}")]
    MalformedCompletion(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProxyError {
    /// Internal failures are logged but rendered as a generic 500.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::MalformedCompletion(_) | Self::Configuration(_)
        )
    }

    /// The message placed in the `error` field of the response body.
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidRequest(msg) => msg.clone(),
            Self::Upstream { message, .. } => message.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.client_message(),
        })
    }
}
