//! Parsing of the `t=<unix-seconds>, v1=<hex>` signature header.

use std::str::FromStr;

use crate::error::{webhook_error, Error, WebhookErrorKind};

/// The timestamp and signature carried by a signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureToken {
    timestamp: i64,
    timestamp_text: String,
    signature: String,
}

impl SignatureToken {
    /// Unix seconds at which the sender signed the delivery.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The timestamp exactly as written in the header; this is what gets signed.
    pub fn timestamp_text(&self) -> &str {
        &self.timestamp_text
    }

    /// The `v1` value. Not yet checked to be valid hex.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl FromStr for SignatureToken {
    type Err = Error;

    fn from_str(header: &str) -> Result<Self, Self::Err> {
        let mut timestamp: Option<&str> = None;
        let mut signature: Option<&str> = None;

        for part in header.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                webhook_error(
                    WebhookErrorKind::MalformedSignature,
                    "signature header entry without '='",
                )
            })?;

            // First occurrence wins; unknown keys (other scheme versions) are ignored.
            match key.trim() {
                "t" if timestamp.is_none() => timestamp = Some(value.trim()),
                "v1" if signature.is_none() => signature = Some(value.trim()),
                _ => {}
            }
        }

        let timestamp_text = timestamp.ok_or_else(|| {
            webhook_error(WebhookErrorKind::MalformedSignature, "missing t entry")
        })?;
        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                webhook_error(WebhookErrorKind::MalformedSignature, "missing v1 entry")
            })?;

        if timestamp_text.is_empty() || !timestamp_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(webhook_error(
                WebhookErrorKind::MalformedSignature,
                "t is not a decimal integer",
            ));
        }
        let timestamp = timestamp_text.parse::<i64>().map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: WebhookErrorKind::MalformedSignature,
        })?;

        Ok(SignatureToken {
            timestamp,
            timestamp_text: timestamp_text.to_string(),
            signature: signature.to_string(),
        })
    }
}
