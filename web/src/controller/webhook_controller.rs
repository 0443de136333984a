//! Controller for handling webhooks from the scheduling service.
//!
//! Handles signed booking notifications and relays them to Slack.

use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::events::EventRegistry;
use domain::gateway::slack::SlackClient;
use domain::relay::{Relay, RelayOutcome, SignedRequest};
use log::*;
use serde::Serialize;

/// Response for webhook acknowledgment
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub ok: bool,
    /// Present only for events that were accepted but not forwarded; `null` when the
    /// payload named no event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_event: Option<Option<String>>,
}

impl From<RelayOutcome> for WebhookResponse {
    fn from(outcome: RelayOutcome) -> Self {
        match outcome {
            RelayOutcome::Forwarded => WebhookResponse {
                ok: true,
                ignored_event: None,
            },
            RelayOutcome::Ignored { event } => WebhookResponse {
                ok: true,
                ignored_event: Some(event),
            },
        }
    }
}

/// POST /webhooks/booking
///
/// Handles booking notifications from the scheduling service. This endpoint does not
/// require a session; it is authenticated by the HMAC signature header instead. The body
/// is taken as raw bytes because the signature covers the exact bytes sent.
pub async fn booking_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    debug!("Received booking webhook ({} bytes)", body.len());

    let config = &app_state.config;
    let settings = app_state.settings_handle().snapshot();
    let events = EventRegistry::default();
    let slack = SlackClient::new(app_state.http_client_ref().clone());

    // Passed through undecoded; a non-UTF-8 value is a malformed header, not an absent one.
    let signature_header = headers
        .get(config.signature_header.as_str())
        .map(HeaderValue::as_bytes);

    let relay = Relay {
        settings: &settings,
        replay_window_secs: config.replay_window_secs,
        events: &events,
        slack: &slack,
    };

    let outcome = relay
        .handle(SignedRequest {
            signature_header,
            body: &body,
            now: chrono::Utc::now().timestamp(),
        })
        .await?;

    if outcome == RelayOutcome::Forwarded {
        info!("Booking notification relayed to Slack");
    }

    Ok((StatusCode::OK, Json(WebhookResponse::from(outcome))))
}
