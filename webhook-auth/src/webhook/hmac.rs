//! HMAC-SHA256 webhook signature validation with a replay window.

use hmac::{Hmac, Mac};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{SignatureToken, WebhookValidator};
use crate::error::{webhook_error, Error, WebhookErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// Seconds a signature stays acceptable on either side of the current time.
pub const DEFAULT_REPLAY_WINDOW_SECS: u64 = 300;

/// HMAC-SHA256 webhook validator.
///
/// The signed content is `"<t>.<body>"`, where `<t>` is the header's timestamp
/// text and `<body>` the raw request bytes. Re-serializing the JSON would yield
/// a different MAC for equivalent documents, so callers must pass the body as
/// received.
pub struct HmacWebhookValidator {
    secret: SecretString,
    replay_window_secs: u64,
}

impl HmacWebhookValidator {
    /// Create a new HMAC webhook validator.
    ///
    /// # Arguments
    ///
    /// * `secret` - Webhook signing secret
    /// * `replay_window_secs` - Maximum distance between the signed timestamp and now
    pub fn new(secret: SecretString, replay_window_secs: u64) -> Self {
        Self {
            secret,
            replay_window_secs,
        }
    }

    /// Lowercase hex HMAC of `"<timestamp_text>.<body>"`.
    pub fn sign(&self, timestamp_text: &str, body: &[u8]) -> Result<String, Error> {
        self.mac_bytes(timestamp_text, body).map(hex::encode)
    }

    fn mac_bytes(&self, timestamp_text: &str, body: &[u8]) -> Result<Vec<u8>, Error> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| webhook_error(WebhookErrorKind::SecretNotConfigured, "Invalid HMAC key"))?;
        mac.update(timestamp_text.as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn check_freshness(&self, token: &SignatureToken, now: i64) -> Result<(), Error> {
        let skew = now.abs_diff(token.timestamp());
        if skew > self.replay_window_secs {
            debug!(
                "Signature timestamp {} is {}s away from now ({})",
                token.timestamp(),
                skew,
                now
            );
            return Err(webhook_error(
                WebhookErrorKind::TimestampExpired,
                &format!("timestamp {skew}s outside the replay window"),
            ));
        }
        Ok(())
    }
}

impl WebhookValidator for HmacWebhookValidator {
    fn validate(
        &self,
        signature_header: Option<&[u8]>,
        body: &[u8],
        now: i64,
    ) -> Result<(), Error> {
        let header = signature_header.ok_or_else(|| {
            webhook_error(
                WebhookErrorKind::MissingSignature,
                "no signature header on request",
            )
        })?;
        let header = std::str::from_utf8(header).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: WebhookErrorKind::MalformedSignature,
        })?;

        let token: SignatureToken = header.parse()?;
        self.check_freshness(&token, now)?;

        let expected = self.mac_bytes(token.timestamp_text(), body)?;
        let provided = hex::decode(token.signature()).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: WebhookErrorKind::InvalidSignature,
        })?;

        // Length is not secret; contents are only compared at equal length.
        if provided.len() != expected.len() {
            return Err(webhook_error(
                WebhookErrorKind::InvalidSignature,
                "signature length differs",
            ));
        }

        if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            Ok(())
        } else {
            Err(webhook_error(
                WebhookErrorKind::InvalidSignature,
                "signature does not match",
            ))
        }
    }
}
