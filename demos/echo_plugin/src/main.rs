//! Echo Plugin Demo
//!
//! A tiny host that reads OneBot v11 event payloads from stdin, one JSON
//! object per line, and prints every outbound API call to stdout as
//! `{"action": ..., "params": ...}`. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! echo '{"post_type":"message","message_type":"private","time":0,"self_id":1,"message_id":1,"user_id":42,"message":"/echo hi","raw_message":"/echo hi"}' \
//!     | cargo run --package echo-plugin -- --config demos/echo_plugin/plume.toml
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use plume::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

// ============================================================================
// Host API
// ============================================================================

/// Writes every action to stdout instead of talking to a chat service.
#[derive(Default)]
struct StdoutApi {
    next_id: AtomicI64,
}

impl Api for StdoutApi {
    fn call_api(&self, action: &str, params: Value) -> ApiResult<Value> {
        let line = json!({ "action": action, "params": params });
        let mut out = io::stdout().lock();
        writeln!(out, "{line}").map_err(|e| ApiError::Other(e.to_string()))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(json!({ "message_id": id }))
    }
}

// ============================================================================
// Declared Handlers
// ============================================================================

/// `/echo <text>` repeats the text.
#[on_message(crate = ::plume::framework, cond::command(["echo"]))]
fn echo(session: &mut MessageSession<'_>) -> ApiResult<()> {
    let text = session.plain_text();
    let body = text.trim_start().trim_start_matches("/echo").trim();
    if !body.is_empty() {
        session.send(body)?;
    }
    Ok(())
}

/// `/ping` in private or when mentioned.
#[on_message(crate = ::plume::framework, cond::command(["ping"]), cond::to_me())]
fn ping(session: &mut MessageSession<'_>) -> ApiResult<()> {
    session.reply("pong")?;
    Ok(())
}

/// Logs every message. Runs first because of its name.
#[on_message(crate = ::plume::framework, name = "00_log")]
fn log_message(session: &mut MessageSession<'_>) {
    info!(
        user = session.user_id,
        group = ?session.group_id,
        text = %session.plain_text(),
        "Message"
    );
}

/// Registered but never dispatched.
#[on_message(crate = ::plume::framework, name = "_dump")]
fn dump(session: &mut MessageSession<'_>) {
    info!(event = ?session.event(), "Dump");
}

#[on_notice(crate = ::plume::framework, cond::notice_type("group_increase"))]
fn welcome(session: &mut NoticeSession<'_>) -> ApiResult<()> {
    let Some(user) = session.user_id else {
        return Ok(());
    };
    session.send(&format!("{} welcome!", cq::at(user)))?;
    Ok(())
}

#[on_request(crate = ::plume::framework, cond::friend_request())]
fn befriend(session: &mut RequestSession<'_>) -> ApiResult<()> {
    session.approve()
}

// ============================================================================
// Configured Plugin
// ============================================================================

#[derive(Debug, Deserialize)]
struct GuardConfig {
    /// Group requests from these users are approved, all others rejected.
    #[serde(default)]
    trusted: Vec<i64>,
    #[serde(default = "default_reason")]
    reason: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            trusted: Vec::new(),
            reason: default_reason(),
        }
    }
}

fn default_reason() -> String {
    "not on the invite list".to_string()
}

fn group_guard() -> impl Plugin {
    plugin_fn("group_guard", |registry, ctx| {
        let config: Arc<GuardConfig> = Arc::new(ctx.get_config_or_default()?);

        let trusted = {
            let config = Arc::clone(&config);
            cond::from_fn(move |e: &RequestEvent| config.trusted.contains(&e.user_id))
        };

        registry.register(
            "group_guard_accept",
            Handler::new(|s: &mut RequestSession<'_>| s.approve())
                .with_condition(cond::group_request() & trusted.clone()),
        );
        registry.register(
            "group_guard_reject",
            Handler::new(move |s: &mut RequestSession<'_>| s.reject(&config.reason))
                .with_condition(cond::group_request() & !trusted),
        );
        Ok(())
    })
}

// ============================================================================
// Main
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "echo-plugin", about = "Feed OneBot events from stdin to Plume handlers")]
struct Args {
    /// Configuration file (default: search for plume.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile
    #[arg(short, long)]
    profile: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }

    let runtime = PlumeRuntime::builder()
        .config_loader(loader)
        .api(Arc::new(StdoutApi::default()))
        .plugin(group_guard())
        .with_static_handlers(true)
        .with_logging(true)
        .build()
        .context("failed to start runtime")?;

    info!(handlers = runtime.registry().len(), "Reading events from stdin");

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match runtime.dispatch_json(&line) {
            Ok(report) => info!(
                category = %report.category,
                invoked = ?report.invoked,
                "Dispatched"
            ),
            Err(RuntimeError::Event(e)) => warn!(error = %e, "Skipping payload"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
