//! Webhook signature validation.

mod hmac;
mod token;

pub use hmac::{HmacWebhookValidator, DEFAULT_REPLAY_WINDOW_SECS};
pub use token::SignatureToken;

use crate::error::Error;

/// Trait for validating webhook signatures.
pub trait WebhookValidator: Send + Sync {
    /// Validate a webhook request.
    ///
    /// # Arguments
    ///
    /// * `signature_header` - Raw bytes of the signature header, `None` when the request had none
    /// * `body` - Raw request body bytes, exactly as received
    /// * `now` - Current time in Unix seconds
    ///
    /// # Returns
    ///
    /// `Ok(())` when the request is authentic, otherwise an error whose kind names the failed check.
    fn validate(&self, signature_header: Option<&[u8]>, body: &[u8], now: i64)
        -> Result<(), Error>;
}
