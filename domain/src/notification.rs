//! Slack message rendering for normalized bookings.
//!
//! The plain-text body and the Block Kit blocks are rendered from the same
//! labeled fields, so clients that fall back to `text` (notifications, mobile
//! previews) show exactly what the blocks show.

use serde::Serialize;

use crate::booking::BookingDetails;

/// First line of every booking notification.
pub const BOOKING_HEADING: &str = "新しい予約が入りました";

/// Body of a Slack incoming-webhook POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub text: String,
    pub blocks: Vec<Block>,
}

/// The subset of Slack Block Kit blocks these notifications use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { fields: Vec<TextObject> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum TextObject {
    PlainText(String),
    Mrkdwn(String),
}

impl Notification {
    /// Renders a heading plus one `・<label>: <value>` line and one block field per entry.
    pub fn from_fields(heading: &str, fields: &[(&str, &str)]) -> Self {
        let mut text = heading.to_string();
        for (label, value) in fields {
            text.push_str(&format!("\n・{label}: {value}"));
        }

        let blocks = vec![
            Block::Header {
                text: TextObject::PlainText(heading.to_string()),
            },
            Block::Section {
                fields: fields
                    .iter()
                    .map(|(label, value)| TextObject::Mrkdwn(format!("*{label}*\n{value}")))
                    .collect(),
            },
        ];

        Notification { text, blocks }
    }

    pub fn for_booking(details: &BookingDetails) -> Self {
        Self::from_fields(BOOKING_HEADING, &details.labeled_fields())
    }
}
