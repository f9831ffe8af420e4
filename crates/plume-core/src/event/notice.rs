//! Notice events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EventCategory, UserEvent};

/// A notice about something that happened around the bot.
///
/// Notice shapes vary widely (`group_upload`, `group_ban`, `friend_add`, …),
/// so only the common fields are typed; everything else stays in
/// [`extra`](NoticeEvent::extra).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeEvent {
    /// Unix timestamp when the event occurred.
    pub time: i64,
    /// Bot's account ID.
    pub self_id: i64,
    /// Notice kind, e.g. `group_increase`.
    pub notice_type: String,
    /// Sub-type, e.g. `approve` / `invite` for `group_increase`.
    #[serde(default)]
    pub sub_type: String,
    /// The user the notice is about.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// The group the notice happened in.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// The user who performed the action (admin, kicker, …).
    #[serde(default)]
    pub operator_id: Option<i64>,
    /// Every other field of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserEvent for NoticeEvent {
    const CATEGORY: EventCategory = EventCategory::Notice;

    fn time(&self) -> i64 {
        self.time
    }

    fn self_id(&self) -> i64 {
        self.self_id
    }

    fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    fn group_id(&self) -> Option<i64> {
        self.group_id
    }
}
