//! Booking notification domain: payload normalization, Slack rendering and the
//! relay pipeline that ties them to webhook authentication.
//!
//! `webhook-auth` types that callers need are re-exported here so that `web`
//! does not depend on `webhook-auth` directly.
pub use webhook_auth::WebhookErrorKind;

pub mod booking;
pub mod error;
pub mod events;
pub mod gateway;
pub mod notification;
pub mod relay;
