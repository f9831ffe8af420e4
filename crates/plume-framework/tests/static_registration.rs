use parking_lot::Mutex;
use plume_framework::{
    Api, ApiResult, Event, EventCategory, Handler, MessageEvent, MessageSession, NoticeSession,
    Registry, RequestSession, STATIC_HANDLERS, cond, dispatch, on_message, on_notice, on_request,
};
use serde_json::{Value, json};

#[derive(Default)]
struct MockApi {
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockApi {
    fn actions(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(a, _)| a.clone()).collect()
    }
}

impl Api for MockApi {
    fn call_api(&self, action: &str, params: Value) -> ApiResult<Value> {
        self.calls.lock().push((action.to_string(), params));
        Ok(json!({ "message_id": 1 }))
    }
}

#[on_message(cond::command(["ping"]))]
fn ping(session: &mut MessageSession<'_>) -> ApiResult<()> {
    session.reply("pong")?;
    Ok(())
}

#[on_message(name = "b_echo", cond::group_message(), cond::startswith("!echo"))]
fn echo(session: &mut MessageSession<'_>) -> ApiResult<()> {
    let text = session.plain_text();
    session.send(text.trim_start_matches("!echo").trim())?;
    Ok(())
}

#[on_message(name = "a_log")]
fn log_everything(session: &mut MessageSession<'_>) -> ApiResult<()> {
    session
        .api()
        .call_api("log", json!({ "handler": session.handler_name() }))
        .map(drop)
}

#[on_message(name = "_hidden")]
fn hidden(session: &mut MessageSession<'_>) -> ApiResult<()> {
    session.send("never").map(drop)
}

#[on_notice(cond::notice_type("group_increase"))]
fn welcome(session: &mut NoticeSession<'_>) -> ApiResult<()> {
    session.send("welcome").map(drop)
}

#[on_request(cond::friend_request())]
fn accept_friends(session: &mut RequestSession<'_>) -> ApiResult<()> {
    session.approve()
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_static();
    registry
}

fn event(raw: Value) -> Event {
    Event::from_json(&raw.to_string()).unwrap()
}

fn private(text: &str) -> Event {
    event(json!({
        "post_type": "message", "message_type": "private", "time": 0, "self_id": 1,
        "message_id": 1, "user_id": 42, "message": text, "raw_message": text
    }))
}

fn group(text: &str) -> Event {
    event(json!({
        "post_type": "message", "message_type": "group", "time": 0, "self_id": 1,
        "message_id": 1, "user_id": 42, "group_id": 7, "message": text, "raw_message": text
    }))
}

#[test]
fn test_declarations_are_collected() {
    assert_eq!(STATIC_HANDLERS.len(), 6);
    let message = STATIC_HANDLERS
        .iter()
        .filter(|h| h.category == EventCategory::Message)
        .count();
    assert_eq!(message, 4);

    let registry = registry();
    let names: Vec<_> = registry.names::<MessageEvent>().collect();
    assert_eq!(names, ["_hidden", "a_log", "b_echo", "ping"]);
    assert_eq!(registry.len(), 6);
}

#[test]
fn test_command_handler_runs_after_log() {
    let registry = registry();
    let api = MockApi::default();

    let report = dispatch(&registry, &private("/ping"), &api);
    assert_eq!(report.invoked, ["a_log", "ping"]);
    assert_eq!(report.disabled, 1);
    assert_eq!(api.actions(), ["log", "send_private_msg"]);
}

#[test]
fn test_conditions_are_combined_with_and() {
    let registry = registry();

    let api = MockApi::default();
    let report = dispatch(&registry, &private("!echo hi"), &api);
    assert_eq!(report.invoked, ["a_log"]);

    let api = MockApi::default();
    let report = dispatch(&registry, &group("!echo hi"), &api);
    assert_eq!(report.invoked, ["a_log", "b_echo"]);
    assert_eq!(api.calls.lock()[1].1, json!({ "group_id": 7, "message": "hi" }));
}

#[test]
fn test_notice_and_request_handlers() {
    let registry = registry();
    let api = MockApi::default();

    let notice = event(json!({
        "post_type": "notice", "time": 0, "self_id": 1,
        "notice_type": "group_increase", "group_id": 7, "user_id": 42
    }));
    assert_eq!(dispatch(&registry, &notice, &api).invoked, ["welcome"]);

    let request = event(json!({
        "post_type": "request", "request_type": "friend", "time": 0, "self_id": 1,
        "user_id": 42, "comment": "hi", "flag": "f1"
    }));
    assert_eq!(dispatch(&registry, &request, &api).invoked, ["accept_friends"]);

    assert_eq!(api.actions(), ["send_group_msg", "set_friend_add_request"]);
}

#[test]
fn test_explicit_registration_replaces_declared() {
    let mut registry = registry();
    registry.register("ping", Handler::<MessageEvent>::empty());

    let api = MockApi::default();
    let report = dispatch(&registry, &private("/ping"), &api);
    assert_eq!(report.invoked, ["a_log"]);
    assert_eq!(api.actions(), ["log"]);
}
