//! Error types for the `webhook-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and an error kind enum.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for webhook-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: WebhookErrorKind,
}

/// Reasons a webhook delivery fails authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookErrorKind {
    /// No signature header on the request.
    MissingSignature,
    /// Header present but not `t=<digits>, v1=<value>`.
    MalformedSignature,
    /// Signature timestamp outside the replay window, in either direction.
    TimestampExpired,
    /// Signature does not match the body under the configured secret.
    InvalidSignature,
    /// The relay has no signing secret or no sink to forward to.
    SecretNotConfigured,
}

impl Error {
    pub fn kind(&self) -> WebhookErrorKind {
        self.error_kind
    }
}

impl fmt::Display for WebhookErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            WebhookErrorKind::MissingSignature => "missing signature header",
            WebhookErrorKind::MalformedSignature => "malformed signature header",
            WebhookErrorKind::TimestampExpired => "signature timestamp outside replay window",
            WebhookErrorKind::InvalidSignature => "signature mismatch",
            WebhookErrorKind::SecretNotConfigured => "webhook relay not configured",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Webhook error: {} ({source})", self.error_kind),
            None => write!(f, "Webhook error: {}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Helper function to create webhook errors.
pub fn webhook_error(kind: WebhookErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: kind,
    }
}
