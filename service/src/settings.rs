//! Relay settings: where to forward notifications and how to verify inbound deliveries.
//!
//! Settings are held as an immutable snapshot. Request handlers take a cheap
//! `Arc` clone of the current snapshot and never observe a half-updated value;
//! a refresh builds a whole new snapshot and swaps it in.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;

use crate::config::Config;

/// The two values the relay needs before it can accept any webhook.
pub struct RelaySettings {
    sink_url: Option<String>,
    signing_secret: Option<SecretString>,
}

impl RelaySettings {
    /// Builds a snapshot, treating blank values as not configured.
    ///
    /// The sink URL is trimmed. The secret is kept byte for byte, since any
    /// whitespace in it is part of the HMAC key.
    pub fn new(sink_url: Option<String>, signing_secret: Option<String>) -> Self {
        Self {
            sink_url: non_blank(sink_url).map(|url| url.trim().to_string()),
            signing_secret: non_blank(signing_secret).map(SecretString::from),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.slack_webhook_url(), config.signing_secret())
    }

    pub fn sink_url(&self) -> Option<&str> {
        self.sink_url.as_deref()
    }

    pub fn signing_secret(&self) -> Option<&SecretString> {
        self.signing_secret.as_ref()
    }

    /// True when both the sink URL and the signing secret are present.
    pub fn is_complete(&self) -> bool {
        self.sink_url.is_some() && self.signing_secret.is_some()
    }
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("sink_url", &self.sink_url.as_ref().map(|_| "[configured]"))
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "[configured]"),
            )
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Shared handle to the current settings snapshot.
#[derive(Clone, Debug)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<RelaySettings>>>,
}

impl SettingsHandle {
    pub fn new(settings: RelaySettings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// Returns the snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<RelaySettings> {
        // A poisoned lock still holds a fully formed snapshot, swaps are a single assignment.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replaces the snapshot. In-flight requests keep the one they already took.
    pub fn replace(&self, settings: RelaySettings) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(settings);
    }
}
