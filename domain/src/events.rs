//! Mapping from webhook event names to the message each one produces.

use std::collections::HashMap;

use log::*;
use serde_json::Value;

use crate::booking::BookingDetails;
use crate::notification::Notification;

/// Event sent by the scheduling service when a guest books a slot.
pub const GUEST_BOOKED: &str = "guest_booked";

/// Builds the Slack message for one kind of event.
pub type MessageBuilder = fn(&Value) -> Notification;

/// What to do with an authenticated delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Forward this message to Slack.
    Forward(Notification),
    /// Acknowledge without forwarding. Holds the event name, if the payload had one.
    Ignored(Option<String>),
}

pub struct EventRegistry {
    builders: HashMap<&'static str, MessageBuilder>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new().register(GUEST_BOOKED, guest_booked)
    }
}

impl EventRegistry {
    /// A registry with no events; every delivery is ignored.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    pub fn register(mut self, event: &'static str, builder: MessageBuilder) -> Self {
        self.builders.insert(event, builder);
        self
    }

    pub fn dispatch(&self, payload: &Value) -> Dispatch {
        let event = payload.get("event").and_then(Value::as_str);

        match event.and_then(|name| self.builders.get(name)) {
            Some(builder) => Dispatch::Forward(builder(payload)),
            None => {
                info!("Ignoring webhook event {:?}", event);
                Dispatch::Ignored(event.map(str::to_string))
            }
        }
    }
}

fn guest_booked(payload: &Value) -> Notification {
    Notification::for_booking(&BookingDetails::from_payload(payload))
}
