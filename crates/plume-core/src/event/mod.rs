//! Event model for the Plume plugin SDK.
//!
//! The host delivers three categories of user-facing events. Each category is
//! a concrete struct carrying the OneBot v11 fields handlers commonly need:
//!
//! ```text
//! Event
//! ├── Message(MessageEvent)   ← post_type = "message"  (private / group / discuss)
//! ├── Notice(NoticeEvent)     ← post_type = "notice"   (group_increase, friend_add, …)
//! └── Request(RequestEvent)   ← post_type = "request"  (friend / group)
//! ```
//!
//! Meta events (heartbeat, lifecycle) are host business and never reach
//! plugin handlers.

pub mod message;
pub mod notice;
pub mod request;

use std::fmt;
use std::str::FromStr;

use crate::error::{EventError, EventResult};

pub use message::{MessageEvent, MessageType, Sender};
pub use notice::NoticeEvent;
pub use request::{RequestEvent, RequestType};

// ============================================================================
// Event Category
// ============================================================================

/// Classification of a user-facing event.
///
/// Every handler belongs to exactly one category, and dispatch only consults
/// the handlers registered for the incoming event's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventCategory {
    /// Private, group and discussion messages.
    Message,
    /// Group changes, recalls, friend additions, etc.
    Notice,
    /// Friend and group-join requests.
    Request,
}

impl EventCategory {
    /// Returns the OneBot `post_type` string of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Message => "message",
            EventCategory::Notice => "notice",
            EventCategory::Request => "request",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(EventCategory::Message),
            "notice" => Ok(EventCategory::Notice),
            "request" => Ok(EventCategory::Request),
            other => Err(EventError::Unsupported {
                post_type: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// UserEvent Trait
// ============================================================================

/// Common accessors shared by the three event categories.
///
/// The associated [`CATEGORY`](UserEvent::CATEGORY) is what routes a handler
/// to its registry and an event to its handlers.
pub trait UserEvent: fmt::Debug + Clone + Send + Sync + 'static {
    /// The category every value of this type belongs to.
    const CATEGORY: EventCategory;

    /// Unix timestamp when the event occurred.
    fn time(&self) -> i64;

    /// The bot account that received the event.
    fn self_id(&self) -> i64;

    /// The user who caused the event, if any.
    fn user_id(&self) -> Option<i64>;

    /// The group the event happened in, if any.
    fn group_id(&self) -> Option<i64>;
}

// ============================================================================
// Event
// ============================================================================

/// A user-facing event tagged with its category.
///
/// This is what the host hands to dispatch.
#[derive(Debug, Clone)]
pub enum Event {
    Message(MessageEvent),
    Notice(NoticeEvent),
    Request(RequestEvent),
}

impl Event {
    /// Returns the category of the wrapped event.
    pub fn category(&self) -> EventCategory {
        match self {
            Event::Message(_) => EventCategory::Message,
            Event::Notice(_) => EventCategory::Notice,
            Event::Request(_) => EventCategory::Request,
        }
    }

    /// Parses a raw OneBot v11 payload.
    ///
    /// The `post_type` field selects the category. `meta_event` payloads and
    /// unknown post types yield [`EventError::Unsupported`].
    pub fn from_json(raw: &str) -> EventResult<Self> {
        let v: serde_json::Value = serde_json::from_str(raw)?;
        let post_type = v
            .get("post_type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EventError::parse("missing post_type"))?;

        match post_type.parse::<EventCategory>()? {
            EventCategory::Message => Ok(Event::Message(serde_json::from_value(v)?)),
            EventCategory::Notice => Ok(Event::Notice(serde_json::from_value(v)?)),
            EventCategory::Request => Ok(Event::Request(serde_json::from_value(v)?)),
        }
    }

    /// Returns the bot account that received the event.
    pub fn self_id(&self) -> i64 {
        match self {
            Event::Message(e) => e.self_id(),
            Event::Notice(e) => e.self_id(),
            Event::Request(e) => e.self_id(),
        }
    }
}

impl From<MessageEvent> for Event {
    fn from(event: MessageEvent) -> Self {
        Event::Message(event)
    }
}

impl From<NoticeEvent> for Event {
    fn from(event: NoticeEvent) -> Self {
        Event::Notice(event)
    }
}

impl From<RequestEvent> for Event {
    fn from(event: RequestEvent) -> Self {
        Event::Request(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("message".parse::<EventCategory>().unwrap(), EventCategory::Message);
        assert_eq!("notice".parse::<EventCategory>().unwrap(), EventCategory::Notice);
        assert_eq!("request".parse::<EventCategory>().unwrap(), EventCategory::Request);
        assert!("meta_event".parse::<EventCategory>().is_err());
    }

    #[test]
    fn test_parse_group_message() {
        let raw = r#"{
            "time": 1700000000,
            "self_id": 10000,
            "post_type": "message",
            "message_type": "group",
            "sub_type": "normal",
            "message_id": 7,
            "group_id": 123,
            "user_id": 456,
            "message": [{"type": "text", "data": {"text": "hello"}}],
            "raw_message": "hello",
            "font": 0,
            "sender": {"user_id": 456, "nickname": "n", "role": "admin"}
        }"#;

        let event = Event::from_json(raw).unwrap();
        assert_eq!(event.category(), EventCategory::Message);
        assert_eq!(event.self_id(), 10000);

        let Event::Message(msg) = event else {
            panic!("Expected message event");
        };
        assert_eq!(msg.message_type, MessageType::Group);
        assert_eq!(msg.group_id, Some(123));
        assert_eq!(msg.plain_text(), "hello");
        assert_eq!(msg.sender.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_parse_notice_keeps_extra_fields() {
        let raw = r#"{
            "time": 1, "self_id": 2, "post_type": "notice",
            "notice_type": "group_ban", "sub_type": "ban",
            "group_id": 3, "operator_id": 4, "user_id": 5, "duration": 600
        }"#;

        let Event::Notice(notice) = Event::from_json(raw).unwrap() else {
            panic!("Expected notice event");
        };
        assert_eq!(notice.notice_type, "group_ban");
        assert_eq!(notice.operator_id, Some(4));
        assert_eq!(notice.extra.get("duration").and_then(|v| v.as_i64()), Some(600));
    }

    #[test]
    fn test_parse_friend_request() {
        let raw = r#"{
            "time": 1, "self_id": 2, "post_type": "request",
            "request_type": "friend", "user_id": 9, "comment": "hi", "flag": "f1"
        }"#;

        let Event::Request(req) = Event::from_json(raw).unwrap() else {
            panic!("Expected request event");
        };
        assert_eq!(req.request_type, RequestType::Friend);
        assert_eq!(req.flag, "f1");
        assert_eq!(req.group_id, None);
    }

    #[test]
    fn test_parse_rejects_meta_and_garbage() {
        let meta = r#"{"time": 1, "self_id": 2, "post_type": "meta_event"}"#;
        assert!(matches!(
            Event::from_json(meta),
            Err(EventError::Unsupported { post_type }) if post_type == "meta_event"
        ));
        assert!(matches!(Event::from_json("not json"), Err(EventError::Parse { .. })));
        assert!(matches!(Event::from_json("{}"), Err(EventError::Parse { .. })));
    }
}
