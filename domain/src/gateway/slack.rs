//! Slack incoming-webhook client.
//!
//! Posts one message per call. A failed post is returned to the caller as is;
//! nothing is retried here.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::notification::Notification;
use log::*;

pub struct SlackClient {
    client: reqwest::Client,
}

impl SlackClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST `notification` as JSON to the incoming webhook at `webhook_url`.
    pub async fn post_message(
        &self,
        webhook_url: &str,
        notification: &Notification,
    ) -> Result<(), Error> {
        debug!("Posting Slack message: {}", notification.text);

        let response = self
            .client
            .post(webhook_url)
            .json(notification)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to send Slack webhook request: {e:?}");
                Error::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            info!("Slack notification delivered ({status})");
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Slack rejected notification: {status} - {error_text}");
            Err(Error {
                source: Some(format!("Slack responded {status}: {error_text}").into()),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            })
        }
    }
}
