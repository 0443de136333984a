//! # webhook-auth
//!
//! Authentication of signed webhook deliveries from the scheduling service.
//!
//! A delivery carries a header of the form `t=<unix-seconds>, v1=<hex>` where
//! `v1` is the HMAC-SHA256 of `"<t>.<raw body>"` keyed by the shared signing
//! secret. Verification rejects stale timestamps before touching the MAC and
//! compares signatures in constant time.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use webhook_auth::webhook::{HmacWebhookValidator, WebhookValidator};
//!
//! let validator = HmacWebhookValidator::new(secret, 300);
//! validator.validate(Some(header_value.as_bytes()), body, now)?;
//! ```

pub mod error;
pub mod webhook;

// Re-export commonly used types
pub use error::{Error, WebhookErrorKind};
