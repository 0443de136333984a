//! The webhook pipeline: authenticate, parse, build, forward.

use log::*;
use serde_json::Value;
use service::settings::RelaySettings;
use webhook_auth::error::webhook_error;
use webhook_auth::webhook::{HmacWebhookValidator, WebhookValidator};
use webhook_auth::WebhookErrorKind;

use crate::error::Error;
use crate::events::{Dispatch, EventRegistry};
use crate::gateway::slack::SlackClient;

/// An inbound delivery, exactly as received.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    /// Raw header bytes; decoding them is part of authentication.
    pub signature_header: Option<&'a [u8]>,
    pub body: &'a [u8],
    /// Current time in Unix seconds.
    pub now: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    Forwarded,
    Ignored { event: Option<String> },
}

/// Everything one delivery needs, borrowed from application state.
pub struct Relay<'a> {
    pub settings: &'a RelaySettings,
    pub replay_window_secs: u64,
    pub events: &'a EventRegistry,
    pub slack: &'a SlackClient,
}

impl Relay<'_> {
    /// Verifies the delivery's signature. Configuration is checked before the request.
    pub fn authenticate(&self, request: &SignedRequest<'_>) -> Result<(), Error> {
        let (Some(secret), Some(_)) = (self.settings.signing_secret(), self.settings.sink_url())
        else {
            return Err(webhook_error(
                WebhookErrorKind::SecretNotConfigured,
                "signing secret or sink URL missing",
            )
            .into());
        };

        HmacWebhookValidator::new(secret.clone(), self.replay_window_secs)
            .validate(request.signature_header, request.body, request.now)
            .map_err(Error::from)
    }

    /// Runs the whole pipeline for one delivery.
    pub async fn handle(&self, request: SignedRequest<'_>) -> Result<RelayOutcome, Error> {
        self.process(request).await.inspect_err(log_failure)
    }

    async fn process(&self, request: SignedRequest<'_>) -> Result<RelayOutcome, Error> {
        self.authenticate(&request)?;

        let payload: Value = serde_json::from_slice(request.body)?;

        match self.events.dispatch(&payload) {
            Dispatch::Ignored(event) => Ok(RelayOutcome::Ignored { event }),
            Dispatch::Forward(notification) => {
                // authenticate() has already checked the sink URL is present.
                let sink_url = self.settings.sink_url().unwrap_or_default();
                self.slack.post_message(sink_url, &notification).await?;
                Ok(RelayOutcome::Forwarded)
            }
        }
    }
}

fn log_failure(err: &Error) {
    if err.is_client_error() {
        warn!("Rejected webhook delivery: {err}");
    } else {
        error!("Webhook delivery not relayed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind, InternalErrorKind};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use webhook_auth::webhook::DEFAULT_REPLAY_WINDOW_SECS;

    const SECRET: &str = "testsecret";

    fn signed_header(secret: &str, now: i64, body: &[u8]) -> String {
        let validator =
            HmacWebhookValidator::new(secret.to_string().into(), DEFAULT_REPLAY_WINDOW_SECS);
        format!(
            "t={now}, v1={}",
            validator.sign(&now.to_string(), body).unwrap()
        )
    }

    fn webhook_kind(err: Error) -> WebhookErrorKind {
        match err.error_kind {
            DomainErrorKind::Webhook(kind) => kind,
            other => panic!("expected webhook error, got {other:?}"),
        }
    }

    fn booking_fixture() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "event": "guest_booked",
            "booking": {
                "id": "bk_20240501_0001",
                "contact": {"name": "山田太郎", "email": "taro.yamada@example.com"},
                "start_at": "2024-05-01T01:00:00Z",
                "end_at": "2024-05-01T02:00:00Z",
                "answers": [
                    {"question": "ご希望のWeb会議URL", "answer": "https://meet.google.com/abc-defg-hij"}
                ]
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_booking_fixture_is_forwarded_with_normalized_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_body(Matcher::PartialJson(json!({
                "text": "新しい予約が入りました\n\
                         ・名前: 山田太郎\n\
                         ・メール: taro.yamada@example.com\n\
                         ・電話番号: 不明\n\
                         ・開始: 2024-05-01 10:00\n\
                         ・終了: 2024-05-01 11:00\n\
                         ・ミーティングURL: https://meet.google.com/abc-defg-hij"
            })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let settings = RelaySettings::new(
            Some(format!("{}/hook", server.url())),
            Some(SECRET.to_string()),
        );
        let events = EventRegistry::default();
        let slack = SlackClient::new(reqwest::Client::new());
        let relay = Relay {
            settings: &settings,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
            events: &events,
            slack: &slack,
        };

        let now = 1_714_525_000;
        let body = booking_fixture();
        let header = signed_header(SECRET, now, &body);
        let outcome = relay
            .handle(SignedRequest {
                signature_header: Some(header.as_bytes()),
                body: &body,
                now,
            })
            .await
            .unwrap();

        assert_eq!(outcome, RelayOutcome::Forwarded);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unrecognized_event_is_not_forwarded() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

        let settings = RelaySettings::new(Some(server.url()), Some(SECRET.to_string()));
        let events = EventRegistry::default();
        let slack = SlackClient::new(reqwest::Client::new());
        let relay = Relay {
            settings: &settings,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
            events: &events,
            slack: &slack,
        };

        let now = 1_714_525_000;
        let body = br#"{"event":"guest_cancelled"}"#;
        let header = signed_header(SECRET, now, body);
        let outcome = relay
            .handle(SignedRequest {
                signature_header: Some(header.as_bytes()),
                body,
                now,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RelayOutcome::Ignored {
                event: Some("guest_cancelled".to_string())
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_configuration_is_reported_before_the_request_is_inspected() {
        let events = EventRegistry::default();
        let slack = SlackClient::new(reqwest::Client::new());

        for settings in [
            RelaySettings::new(None, Some(SECRET.to_string())),
            RelaySettings::new(Some("https://hooks.slack.com/x".to_string()), None),
        ] {
            let relay = Relay {
                settings: &settings,
                replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
                events: &events,
                slack: &slack,
            };
            // No header at all: configuration still wins.
            let err = relay
                .handle(SignedRequest {
                    signature_header: None,
                    body: b"{}",
                    now: 0,
                })
                .await
                .unwrap_err();

            assert_eq!(webhook_kind(err), WebhookErrorKind::SecretNotConfigured);
        }
    }

    #[tokio::test]
    async fn test_signature_with_other_secret_is_rejected() {
        let settings = RelaySettings::new(
            Some("https://hooks.slack.com/x".to_string()),
            Some(SECRET.to_string()),
        );
        let events = EventRegistry::default();
        let slack = SlackClient::new(reqwest::Client::new());
        let relay = Relay {
            settings: &settings,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
            events: &events,
            slack: &slack,
        };

        let body = booking_fixture();
        let header = signed_header("wrongsecret", 1_714_525_000, &body);
        let err = relay
            .handle(SignedRequest {
                signature_header: Some(header.as_bytes()),
                body: &body,
                now: 1_714_525_000,
            })
            .await
            .unwrap_err();

        assert_eq!(webhook_kind(err), WebhookErrorKind::InvalidSignature);
    }

    #[tokio::test]
    async fn test_authentic_but_unparseable_body_is_a_payload_error() {
        let settings = RelaySettings::new(
            Some("https://hooks.slack.com/x".to_string()),
            Some(SECRET.to_string()),
        );
        let events = EventRegistry::default();
        let slack = SlackClient::new(reqwest::Client::new());
        let relay = Relay {
            settings: &settings,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
            events: &events,
            slack: &slack,
        };

        let body = b"event=guest_booked";
        let header = signed_header(SECRET, 100, body);
        let err = relay
            .handle(SignedRequest {
                signature_header: Some(header.as_bytes()),
                body,
                now: 100,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Payload)
        );
    }

    #[tokio::test]
    async fn test_slack_failure_is_surfaced_without_retry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let settings = RelaySettings::new(
            Some(format!("{}/hook", server.url())),
            Some(SECRET.to_string()),
        );
        let events = EventRegistry::default();
        let slack = SlackClient::new(reqwest::Client::new());
        let relay = Relay {
            settings: &settings,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
            events: &events,
            slack: &slack,
        };

        let body = booking_fixture();
        let header = signed_header(SECRET, 1_714_525_000, &body);
        let err = relay
            .handle(SignedRequest {
                signature_header: Some(header.as_bytes()),
                body: &body,
                now: 1_714_525_000,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Network)
        );
        mock.assert_async().await;
    }
}
