//! The host API seen by plugins.
//!
//! Plume never talks to the chat service itself. Everything a handler wants
//! to *do* (send a message, answer a request) goes through an [`Api`]
//! implementation supplied by the host process. Only
//! [`call_api`](Api::call_api) must be implemented; the typed helpers build
//! OneBot v11 action payloads on top of it.

use serde_json::{Value, json};
use tracing::trace;

use crate::error::ApiResult;

// ============================================================================
// Target
// ============================================================================

/// A conversation a message can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Private(i64),
    Group(i64),
    Discuss(i64),
}

// ============================================================================
// Api Trait
// ============================================================================

/// Outbound interface implemented by the host.
///
/// # Example
///
/// ```rust,ignore
/// struct StdoutApi;
///
/// impl Api for StdoutApi {
///     fn call_api(&self, action: &str, params: Value) -> ApiResult<Value> {
///         println!("{action}: {params}");
///         Ok(Value::Null)
///     }
/// }
/// ```
pub trait Api: Send + Sync {
    /// Performs `action` with `params` and returns the response `data` field.
    fn call_api(&self, action: &str, params: Value) -> ApiResult<Value>;

    /// Sends a private message and returns its message ID.
    fn send_private_msg(&self, user_id: i64, message: &str) -> ApiResult<i64> {
        let data = self.call_api(
            "send_private_msg",
            json!({ "user_id": user_id, "message": message }),
        )?;
        Ok(message_id(&data))
    }

    /// Sends a group message and returns its message ID.
    fn send_group_msg(&self, group_id: i64, message: &str) -> ApiResult<i64> {
        let data = self.call_api(
            "send_group_msg",
            json!({ "group_id": group_id, "message": message }),
        )?;
        Ok(message_id(&data))
    }

    /// Sends a discussion message and returns its message ID.
    fn send_discuss_msg(&self, discuss_id: i64, message: &str) -> ApiResult<i64> {
        let data = self.call_api(
            "send_discuss_msg",
            json!({ "discuss_id": discuss_id, "message": message }),
        )?;
        Ok(message_id(&data))
    }

    /// Sends a message to `target`.
    fn send(&self, target: Target, message: &str) -> ApiResult<i64> {
        trace!(?target, "Sending message");
        match target {
            Target::Private(id) => self.send_private_msg(id, message),
            Target::Group(id) => self.send_group_msg(id, message),
            Target::Discuss(id) => self.send_discuss_msg(id, message),
        }
    }

    /// Answers a friend request.
    fn set_friend_add_request(&self, flag: &str, approve: bool, remark: &str) -> ApiResult<()> {
        self.call_api(
            "set_friend_add_request",
            json!({ "flag": flag, "approve": approve, "remark": remark }),
        )?;
        Ok(())
    }

    /// Answers a group join request or invitation.
    fn set_group_add_request(
        &self,
        flag: &str,
        sub_type: &str,
        approve: bool,
        reason: &str,
    ) -> ApiResult<()> {
        self.call_api(
            "set_group_add_request",
            json!({ "flag": flag, "sub_type": sub_type, "approve": approve, "reason": reason }),
        )?;
        Ok(())
    }
}

/// Hosts that do not report a message ID get `0`.
fn message_id(data: &Value) -> i64 {
    data.get("message_id").and_then(Value::as_i64).unwrap_or_default()
}
