use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use domain::error::{
    DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};
use domain::WebhookErrorKind;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match &self.0.error_kind {
            DomainErrorKind::Webhook(webhook_error_kind) => match webhook_error_kind {
                WebhookErrorKind::MissingSignature => {
                    (StatusCode::BAD_REQUEST, "Missing signature header")
                }
                WebhookErrorKind::MalformedSignature => {
                    (StatusCode::BAD_REQUEST, "Invalid signature header")
                }
                WebhookErrorKind::TimestampExpired => (StatusCode::UNAUTHORIZED, "Stale signature"),
                WebhookErrorKind::InvalidSignature => {
                    (StatusCode::UNAUTHORIZED, "Invalid signature")
                }
                WebhookErrorKind::SecretNotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Webhook configuration missing",
                ),
            },
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Payload => (StatusCode::BAD_REQUEST, "Invalid JSON payload"),
                InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => {
                    (StatusCode::BAD_GATEWAY, "Failed to notify Slack")
                }
            },
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
