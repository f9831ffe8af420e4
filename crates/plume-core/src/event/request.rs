//! Request events.

use serde::{Deserialize, Serialize};

use super::{EventCategory, UserEvent};

/// What is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Someone wants to add the bot as a friend.
    Friend,
    /// Someone wants to join a group, or invites the bot into one.
    Group,
}

/// A request awaiting the bot's approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    /// Unix timestamp when the event occurred.
    pub time: i64,
    /// Bot's account ID.
    pub self_id: i64,
    /// Request kind.
    pub request_type: RequestType,
    /// `add` or `invite` for group requests.
    #[serde(default)]
    pub sub_type: String,
    /// Requesting user.
    pub user_id: i64,
    /// Target group for group requests.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Verification message.
    #[serde(default)]
    pub comment: String,
    /// Opaque token the host needs to answer the request.
    pub flag: String,
}

impl UserEvent for RequestEvent {
    const CATEGORY: EventCategory = EventCategory::Request;

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
