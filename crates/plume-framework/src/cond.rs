//! Ready-made guard conditions.
//!
//! Text conditions look at [`MessageEvent::plain_text`], so CQ codes such as
//! mentions never get in the way of a prefix match. Prefix checks ignore
//! leading whitespace, suffix checks ignore trailing whitespace.

use std::collections::HashSet;

use plume_core::{MessageEvent, MessageType, NoticeEvent, RequestEvent, RequestType, UserEvent, cq};
use serde_json::Value;

pub use crate::condition::{All, Any, Cond, Condition, Not};

// ============================================================================
// Generic
// ============================================================================

/// Always matches.
pub fn always<E: 'static>() -> Cond<E> {
    Cond::new(|_: &E| true)
}

/// Wraps a closure.
pub fn from_fn<E, F>(f: F) -> Cond<E>
where
    E: 'static,
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    Cond::new(f)
}

/// Matches when every condition matches.
pub fn all<E: 'static>(conditions: impl IntoIterator<Item = Cond<E>>) -> Cond<E> {
    Cond::new(All::new(conditions))
}

/// Matches when any condition matches.
pub fn any<E: 'static>(conditions: impl IntoIterator<Item = Cond<E>>) -> Cond<E> {
    Cond::new(Any::new(conditions))
}

/// Matches events caused by one of `ids`.
pub fn user<E: UserEvent>(ids: impl IntoIterator<Item = i64>) -> Cond<E> {
    let ids: HashSet<i64> = ids.into_iter().collect();
    Cond::new(move |e: &E| e.user_id().is_some_and(|id| ids.contains(&id)))
}

/// Matches events that happened in one of the groups `ids`.
pub fn group<E: UserEvent>(ids: impl IntoIterator<Item = i64>) -> Cond<E> {
    let ids: HashSet<i64> = ids.into_iter().collect();
    Cond::new(move |e: &E| e.group_id().is_some_and(|id| ids.contains(&id)))
}

// ============================================================================
// Message
// ============================================================================

fn message_type(kind: MessageType) -> Cond<MessageEvent> {
    Cond::new(move |e: &MessageEvent| e.message_type == kind)
}

/// Private messages only.
pub fn private() -> Cond<MessageEvent> {
    message_type(MessageType::Private)
}

/// Group messages only.
pub fn group_message() -> Cond<MessageEvent> {
    message_type(MessageType::Group)
}

/// Discussion messages only.
pub fn discuss() -> Cond<MessageEvent> {
    message_type(MessageType::Discuss)
}

/// The message text starts with `prefix`.
pub fn startswith(prefix: impl Into<String>) -> Cond<MessageEvent> {
    let prefix = prefix.into();
    Cond::new(move |e: &MessageEvent| e.plain_text().trim_start().starts_with(&prefix))
}

/// The message text ends with `suffix`.
pub fn endswith(suffix: impl Into<String>) -> Cond<MessageEvent> {
    let suffix = suffix.into();
    Cond::new(move |e: &MessageEvent| e.plain_text().trim_end().ends_with(&suffix))
}

/// The message text contains `needle`.
pub fn contains(needle: impl Into<String>) -> Cond<MessageEvent> {
    let needle = needle.into();
    Cond::new(move |e: &MessageEvent| e.plain_text().contains(&needle))
}

/// The message is addressed to the bot: a private message, or one that
/// mentions the bot account.
pub fn to_me() -> Cond<MessageEvent> {
    Cond::new(|e: &MessageEvent| e.is_private() || mentions(e, e.self_id))
}

/// The sender is a group owner or admin.
pub fn admin() -> Cond<MessageEvent> {
    Cond::new(|e: &MessageEvent| {
        matches!(e.sender.role.as_deref(), Some("owner") | Some("admin"))
    })
}

/// Matches a command word, see [`Command`].
pub fn command<I, S>(names: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Command::new(names)
}

fn mentions(event: &MessageEvent, user_id: i64) -> bool {
    match &event.message {
        Value::Array(segments) => {
            let id = user_id.to_string();
            segments.iter().any(|seg| {
                seg.get("type").and_then(Value::as_str) == Some("at")
                    && match seg.get("data").and_then(|d| d.get("qq")) {
                        Some(Value::String(s)) => *s == id,
                        Some(Value::Number(n)) => n.as_i64() == Some(user_id),
                        _ => false,
                    }
            })
        }
        Value::String(s) => cq::is_at(s, user_id),
        _ => cq::is_at(&event.raw_message, user_id),
    }
}

// ============================================================================
// Command
// ============================================================================

/// Matches messages whose first word is one of the command names, written
/// after one of the starter prefixes.
///
/// The default starter is `/`, so `command(["roll"])` matches `/roll 2d6`.
/// The word must follow the starter directly: `/ roll` is not a command.
/// Use [`starters`](Command::starters) with `[""]` to accept bare words.
#[derive(Debug, Clone)]
pub struct Command {
    names: HashSet<String>,
    starters: Vec<String>,
}

impl Command {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            starters: vec!["/".to_string()],
        }
    }

    /// Replaces the accepted starter prefixes.
    pub fn starters<I, S>(mut self, starters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.starters = starters.into_iter().map(Into::into).collect();
        self
    }

    fn matches_text(&self, text: &str) -> bool {
        let text = text.trim_start();
        self.starters.iter().any(|starter| {
            text.strip_prefix(starter.as_str())
                .and_then(|rest| rest.split(char::is_whitespace).next())
                .is_some_and(|word| !word.is_empty() && self.names.contains(word))
        })
    }
}

impl Condition<MessageEvent> for Command {
    fn check(&self, event: &MessageEvent) -> bool {
        self.matches_text(&event.plain_text())
    }
}

impl From<Command> for Cond<MessageEvent> {
    fn from(command: Command) -> Self {
        Cond::new(command)
    }
}

// ============================================================================
// Notice / Request
// ============================================================================

/// Notices of the given `notice_type`.
pub fn notice_type(name: impl Into<String>) -> Cond<NoticeEvent> {
    let name = name.into();
    Cond::new(move |e: &NoticeEvent| e.notice_type == name)
}

/// Friend requests only.
pub fn friend_request() -> Cond<RequestEvent> {
    Cond::new(|e: &RequestEvent| e.request_type == RequestType::Friend)
}

/// Group join requests and invitations only.
pub fn group_request() -> Cond<RequestEvent> {
    Cond::new(|e: &RequestEvent| e.request_type == RequestType::Group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::Sender;
    use serde_json::json;

    fn message(kind: MessageType, text: &str) -> MessageEvent {
        MessageEvent {
            time: 0,
            self_id: 10000,
            message_id: 1,
            message_type: kind,
            sub_type: String::new(),
            user_id: 42,
            group_id: (kind == MessageType::Group).then_some(7),
            discuss_id: None,
            message: Value::String(text.to_string()),
            raw_message: text.to_string(),
            font: 0,
            sender: Sender::default(),
        }
    }

    #[test]
    fn test_message_type_conditions() {
        let private_msg = message(MessageType::Private, "hi");
        let group_msg = message(MessageType::Group, "hi");

        assert!(private().check(&private_msg));
        assert!(!private().check(&group_msg));
        assert!(group_message().check(&group_msg));
        assert!(!discuss().check(&group_msg));
    }

    #[test]
    fn test_text_conditions() {
        let msg = message(MessageType::Group, "[CQ:at,qq=10000]  echo hello world ");

        assert!(startswith("echo").check(&msg));
        assert!(!startswith("hello").check(&msg));
        assert!(endswith("world").check(&msg));
        assert!(contains("hello").check(&msg));
        assert!(!contains("bye").check(&msg));
    }

    #[test]
    fn test_user_and_group() {
        let msg = message(MessageType::Group, "hi");

        assert!(user::<MessageEvent>([1, 42]).check(&msg));
        assert!(!user::<MessageEvent>([1]).check(&msg));
        assert!(group::<MessageEvent>([7]).check(&msg));
        assert!(!group::<MessageEvent>([7]).check(&message(MessageType::Private, "hi")));
    }

    #[test]
    fn test_to_me() {
        assert!(to_me().check(&message(MessageType::Private, "hi")));
        assert!(to_me().check(&message(MessageType::Group, "[CQ:at,qq=10000] hi")));
        assert!(!to_me().check(&message(MessageType::Group, "[CQ:at,qq=1] hi")));

        let mut msg = message(MessageType::Group, "");
        msg.message = json!([{"type": "at", "data": {"qq": "10000"}}]);
        assert!(to_me().check(&msg));
    }

    #[test]
    fn test_admin() {
        let mut msg = message(MessageType::Group, "hi");
        assert!(!admin().check(&msg));
        msg.sender.role = Some("owner".into());
        assert!(admin().check(&msg));
        msg.sender.role = Some("member".into());
        assert!(!admin().check(&msg));
    }

    #[test]
    fn test_command() {
        let roll = command(["roll", "r"]);
        assert!(roll.check(&message(MessageType::Private, "/roll 2d6")));
        assert!(roll.check(&message(MessageType::Private, "  /r")));
        assert!(!roll.check(&message(MessageType::Private, "roll 2d6")));
        assert!(!roll.check(&message(MessageType::Private, "/rolling")));

        let bare = command(["roll"]).starters(["", "!"]);
        assert!(bare.check(&message(MessageType::Private, "roll")));
        assert!(bare.check(&message(MessageType::Private, "!roll")));
    }

    #[test]
    fn test_command_word_follows_starter_directly() {
        let ping = command(["ping"]);
        assert!(!ping.check(&message(MessageType::Private, "/ ping")));
        assert!(!ping.check(&message(MessageType::Private, "/\nping")));
        assert!(!ping.check(&message(MessageType::Private, "/")));
        assert!(ping.check(&message(MessageType::Private, "/ping\nrest")));

        let bare = command(["ping"]).starters([""]);
        assert!(!bare.check(&message(MessageType::Private, "   ")));
    }

    #[test]
    fn test_request_conditions() {
        let req = RequestEvent {
            time: 0,
            self_id: 1,
            request_type: RequestType::Group,
            sub_type: "add".into(),
            user_id: 2,
            group_id: Some(3),
            comment: String::new(),
            flag: "f".into(),
        };
        assert!(group_request().check(&req));
        assert!(!friend_request().check(&req));
    }
}
