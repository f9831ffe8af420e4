//! Per-invocation sessions.
//!
//! Dispatch builds a fresh [`Session`] for every handler it runs and drops it
//! as soon as the callback returns. A session borrows the event and the host
//! [`Api`]; it dereferences to the event, so `session.user_id` works.

use std::fmt;
use std::ops::Deref;

use plume_core::{
    Api, ApiError, ApiResult, MessageEvent, MessageType, NoticeEvent, RequestEvent, RequestType,
    Target, cq,
};

/// The context handed to a handler callback.
pub struct Session<'a, E> {
    event: &'a E,
    api: &'a dyn Api,
    handler: &'a str,
}

/// Session for message handlers.
pub type MessageSession<'a> = Session<'a, MessageEvent>;
/// Session for notice handlers.
pub type NoticeSession<'a> = Session<'a, NoticeEvent>;
/// Session for request handlers.
pub type RequestSession<'a> = Session<'a, RequestEvent>;

impl<'a, E> Session<'a, E> {
    pub fn new(event: &'a E, api: &'a dyn Api, handler: &'a str) -> Self {
        Self {
            event,
            api,
            handler,
        }
    }

    pub fn event(&self) -> &'a E {
        self.event
    }

    pub fn api(&self) -> &'a dyn Api {
        self.api
    }

    /// Registry key of the handler this session was built for.
    pub fn handler_name(&self) -> &'a str {
        self.handler
    }
}

impl<E> Deref for Session<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.event
    }
}

impl<E: fmt::Debug> fmt::Debug for Session<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("handler", &self.handler)
            .field("event", self.event)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Message
// ============================================================================

impl Session<'_, MessageEvent> {
    /// Sends `message` to the conversation the event came from.
    pub fn send(&self, message: &str) -> ApiResult<i64> {
        let target = self
            .event
            .target()
            .ok_or(ApiError::MissingTarget("conversation"))?;
        self.api.send(target, message)
    }

    /// Like [`send`](Self::send), but mentions the sender outside private
    /// chats.
    pub fn reply(&self, message: &str) -> ApiResult<i64> {
        match self.event.message_type {
            MessageType::Private => self.send(message),
            MessageType::Group | MessageType::Discuss => {
                self.send(&format!("{} {}", cq::at(self.event.user_id), message))
            }
        }
    }
}

// ============================================================================
// Notice
// ============================================================================

impl Session<'_, NoticeEvent> {
    /// Sends `message` to the notice's group, or privately to its user.
    pub fn send(&self, message: &str) -> ApiResult<i64> {
        let target = match (self.event.group_id, self.event.user_id) {
            (Some(group), _) => Target::Group(group),
            (None, Some(user)) => Target::Private(user),
            (None, None) => return Err(ApiError::MissingTarget("group or user")),
        };
        self.api.send(target, message)
    }
}

// ============================================================================
// Request
// ============================================================================

impl Session<'_, RequestEvent> {
    pub fn approve(&self) -> ApiResult<()> {
        self.answer(true, "")
    }

    /// Approves a friend request and sets the new friend's remark.
    ///
    /// For group requests the remark is ignored.
    pub fn approve_with_remark(&self, remark: &str) -> ApiResult<()> {
        self.answer(true, remark)
    }

    /// Rejects the request. `reason` is shown for group requests only.
    pub fn reject(&self, reason: &str) -> ApiResult<()> {
        self.answer(false, reason)
    }

    fn answer(&self, approve: bool, text: &str) -> ApiResult<()> {
        let event = self.event;
        match event.request_type {
            RequestType::Friend => {
                let remark = if approve { text } else { "" };
                self.api.set_friend_add_request(&event.flag, approve, remark)
            }
            RequestType::Group => {
                let reason = if approve { "" } else { text };
                self.api
                    .set_group_add_request(&event.flag, &event.sub_type, approve, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingApi, group_message, private_message};
    use serde_json::json;

    #[test]
    fn test_session_accessors() {
        let api = RecordingApi::new();
        let event = private_message(5, "hi");
        let session = Session::new(&event, &api, "greeter");

        assert_eq!(session.handler_name(), "greeter");
        assert_eq!(session.event().user_id, 5);
        assert_eq!(session.user_id, 5);
    }

    #[test]
    fn test_message_send_and_reply() {
        let api = RecordingApi::new();
        let event = group_message(9, 5, "hi");
        let session = Session::new(&event, &api, "h");

        assert_eq!(session.send("plain").unwrap(), 1);
        session.reply("hello").unwrap();

        let calls = api.calls();
        assert_eq!(calls[0].0, "send_group_msg");
        assert_eq!(calls[0].1, json!({ "group_id": 9, "message": "plain" }));
        assert_eq!(calls[1].1["message"], "[CQ:at,qq=5] hello");
    }

    #[test]
    fn test_private_reply_has_no_mention() {
        let api = RecordingApi::new();
        let event = private_message(5, "hi");
        Session::new(&event, &api, "h").reply("hello").unwrap();

        assert_eq!(
            api.calls(),
            vec![(
                "send_private_msg".to_string(),
                json!({ "user_id": 5, "message": "hello" })
            )]
        );
    }

    #[test]
    fn test_group_message_without_group_id() {
        let api = RecordingApi::new();
        let mut event = group_message(9, 5, "hi");
        event.group_id = None;
        let err = Session::new(&event, &api, "h").send("x").unwrap_err();
        assert!(matches!(err, ApiError::MissingTarget(_)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_notice_send() {
        let api = RecordingApi::new();
        let mut event: NoticeEvent = serde_json::from_value(json!({
            "time": 0, "self_id": 1, "notice_type": "friend_add", "user_id": 3
        }))
        .unwrap();
        Session::new(&event, &api, "h").send("welcome").unwrap();
        assert_eq!(api.actions(), vec!["send_private_msg"]);

        event.user_id = None;
        assert!(Session::new(&event, &api, "h").send("x").is_err());
    }

    #[test]
    fn test_request_answers() {
        let api = RecordingApi::new();
        let mut event = RequestEvent {
            time: 0,
            self_id: 1,
            request_type: RequestType::Friend,
            sub_type: String::new(),
            user_id: 2,
            group_id: None,
            comment: String::new(),
            flag: "flag-1".into(),
        };
        Session::new(&event, &api, "h").approve_with_remark("pal").unwrap();

        event.request_type = RequestType::Group;
        event.sub_type = "add".into();
        Session::new(&event, &api, "h").reject("full").unwrap();

        let calls = api.calls();
        assert_eq!(
            calls[0].1,
            json!({ "flag": "flag-1", "approve": true, "remark": "pal" })
        );
        assert_eq!(calls[1].0, "set_group_add_request");
        assert_eq!(
            calls[1].1,
            json!({ "flag": "flag-1", "sub_type": "add", "approve": false, "reason": "full" })
        );
    }
}
