//! Message events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{EventCategory, UserEvent};
use crate::api::Target;
use crate::cq;

// ============================================================================
// Shared Types
// ============================================================================

/// Where a message was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Private,
    Group,
    Discuss,
}

/// Message sender information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sender {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Group card (group nickname).
    #[serde(default)]
    pub card: Option<String>,
    /// Group role ("owner", "admin", "member").
    #[serde(default)]
    pub role: Option<String>,
}

// ============================================================================
// MessageEvent
// ============================================================================

/// A message received in a private chat, group or discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Unix timestamp when the event occurred.
    pub time: i64,
    /// Bot's account ID.
    pub self_id: i64,
    /// Message ID.
    pub message_id: i64,
    /// Conversation kind.
    pub message_type: MessageType,
    /// Sub-type ("friend", "normal", "anonymous", ...).
    #[serde(default)]
    pub sub_type: String,
    /// Sender's user ID.
    pub user_id: i64,
    /// Group ID for group messages.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Discussion ID for discussion messages.
    #[serde(default)]
    pub discuss_id: Option<i64>,
    /// Message content: a CQ-code string or an array of segments.
    #[serde(default)]
    pub message: Value,
    /// Raw message string (CQ codes or plain text).
    #[serde(default)]
    pub raw_message: String,
    /// Font (usually 0).
    #[serde(default)]
    pub font: i32,
    /// Sender information.
    #[serde(default)]
    pub sender: Sender,
}

impl MessageEvent {
    /// Extracts the plain text of the message, dropping rich segments.
    pub fn plain_text(&self) -> String {
        match &self.message {
            Value::Array(segments) => segments
                .iter()
                .filter_map(|seg| {
                    if seg.get("type")?.as_str()? == "text" {
                        seg.get("data")?.get("text")?.as_str()
                    } else {
                        None
                    }
                })
                .collect(),
            Value::String(s) => cq::strip_codes(s),
            _ => cq::strip_codes(&self.raw_message),
        }
    }

    /// The conversation replies to this message should go to.
    pub fn target(&self) -> Option<Target> {
        match self.message_type {
            MessageType::Private => Some(Target::Private(self.user_id)),
            MessageType::Group => self.group_id.map(Target::Group),
            MessageType::Discuss => self.discuss_id.map(Target::Discuss),
        }
    }

    /// Returns `true` for private messages.
    pub fn is_private(&self) -> bool {
        self.message_type == MessageType::Private
    }
}

impl UserEvent for MessageEvent {
    const CATEGORY: EventCategory = EventCategory::Message;

    fn time(&self) -> i64 {
        self.time
    }

    fn self_id(&self) -> i64 {
        self.self_id
    }

    fn user_id(&self) -> Option<i64> {
        Some(self.user_id)
    }

    fn group_id(&self) -> Option<i64> {
        self.group_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: Value, raw: &str) -> MessageEvent {
        MessageEvent {
            time: 0,
            self_id: 1,
            message_id: 1,
            message_type: MessageType::Private,
            sub_type: "friend".into(),
            user_id: 2,
            group_id: None,
            discuss_id: None,
            message,
            raw_message: raw.into(),
            font: 0,
            sender: Sender::default(),
        }
    }

    #[test]
    fn test_plain_text_from_segments() {
        let msg = event(
            serde_json::json!([
                {"type": "at", "data": {"qq": "1"}},
                {"type": "text", "data": {"text": " hi "}},
                {"type": "image", "data": {"file": "x"}},
                {"type": "text", "data": {"text": "there"}}
            ]),
            "",
        );
        assert_eq!(msg.plain_text(), " hi there");
    }

    #[test]
    fn test_plain_text_from_string_and_raw() {
        let msg = event(Value::String("[CQ:face,id=1]a &amp; b".into()), "");
        assert_eq!(msg.plain_text(), "a & b");

        let msg = event(Value::Null, "[CQ:at,qq=1]raw");
        assert_eq!(msg.plain_text(), "raw");
    }

    #[test]
    fn test_target() {
        let mut msg = event(Value::Null, "");
        assert_eq!(msg.target(), Some(Target::Private(2)));

        msg.message_type = MessageType::Group;
        assert_eq!(msg.target(), None);
        msg.group_id = Some(9);
        assert_eq!(msg.target(), Some(Target::Group(9)));
    }
}
