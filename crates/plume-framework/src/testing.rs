//! Test helpers: a recording [`Api`] and event constructors.
//!
//! Enabled in this crate's own tests and, for downstream crates, with the
//! `testing` feature.

use parking_lot::Mutex;
use plume_core::{Api, ApiResult, MessageEvent, MessageType, Sender};
use serde_json::{Value, json};

/// Account ID used as `self_id` by the event constructors.
pub const SELF_ID: i64 = 10000;

/// An [`Api`] that records every action instead of performing it.
///
/// Each call answers with `{"message_id": n}`, where `n` counts calls from 1.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(action, params)` pair seen so far, oldest first.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(a, _)| a.clone()).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Api for RecordingApi {
    fn call_api(&self, action: &str, params: Value) -> ApiResult<Value> {
        let mut calls = self.calls.lock();
        calls.push((action.to_string(), params));
        Ok(json!({ "message_id": calls.len() }))
    }
}

/// A private text message from `user_id`.
pub fn private_message(user_id: i64, text: &str) -> MessageEvent {
    message(MessageType::Private, None, user_id, text)
}

/// A group text message from `user_id` in `group_id`.
pub fn group_message(group_id: i64, user_id: i64, text: &str) -> MessageEvent {
    message(MessageType::Group, Some(group_id), user_id, text)
}

fn message(kind: MessageType, group_id: Option<i64>, user_id: i64, text: &str) -> MessageEvent {
    MessageEvent {
        time: 0,
        self_id: SELF_ID,
        message_id: 1,
        message_type: kind,
        sub_type: String::new(),
        user_id,
        group_id,
        discuss_id: None,
        message: Value::String(text.to_string()),
        raw_message: text.to_string(),
        font: 0,
        sender: Sender {
            user_id: Some(user_id),
            ..Sender::default()
        },
    }
}
