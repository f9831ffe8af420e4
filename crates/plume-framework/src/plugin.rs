//! Plugins: named bundles of handler registrations.
//!
//! A plugin receives the [`Registry`] together with a [`PluginContext`]
//! carrying its own configuration section, taken from `plugins.<name>` in
//! the host configuration.
//!
//! ```rust,ignore
//! #[derive(serde::Deserialize, Default)]
//! struct EchoConfig {
//!     prefix: String,
//! }
//!
//! let echo = plugin_fn("echo", |registry, ctx| {
//!     let config: EchoConfig = ctx.get_config_or_default()?;
//!     registry.register(
//!         "echo",
//!         Handler::new(move |s: &mut MessageSession<'_>| s.reply(&config.prefix).map(drop))
//!             .with_condition(cond::command(["echo"])),
//!     );
//!     Ok(())
//! });
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PluginError, PluginResult};
use crate::registry::Registry;

// ============================================================================
// PluginContext
// ============================================================================

/// What a plugin is given while it registers.
#[derive(Debug, Clone)]
pub struct PluginContext {
    name: String,
    config: Arc<Value>,
}

impl PluginContext {
    pub fn new(name: impl Into<String>, config: Value) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw configuration section; `Value::Null` when absent.
    pub fn raw_config(&self) -> &Value {
        &self.config
    }

    /// Deserializes the configuration section into `T`.
    pub fn get_config<T: DeserializeOwned>(&self) -> PluginResult<T> {
        T::deserialize(&*self.config).map_err(|source| PluginError::Config {
            plugin: self.name.clone(),
            source,
        })
    }

    /// Like [`get_config`](Self::get_config), but an absent section yields
    /// `T::default()`.
    pub fn get_config_or_default<T: DeserializeOwned + Default>(&self) -> PluginResult<T> {
        if self.config.is_null() {
            Ok(T::default())
        } else {
            self.get_config()
        }
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// A unit of handler registrations.
pub trait Plugin: Send + Sync {
    /// Name used for logging and to look up the configuration section.
    fn name(&self) -> &str;

    /// Registers this plugin's handlers.
    fn register(&self, registry: &mut Registry, ctx: &PluginContext) -> PluginResult<()>;
}

type RegisterFn = dyn Fn(&mut Registry, &PluginContext) -> PluginResult<()> + Send + Sync;

/// A [`Plugin`] made from a name and a registration closure.
pub struct FnPlugin {
    name: String,
    register: Box<RegisterFn>,
}

impl Plugin for FnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn register(&self, registry: &mut Registry, ctx: &PluginContext) -> PluginResult<()> {
        (self.register)(registry, ctx)
    }
}

impl fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin").field("name", &self.name).finish()
    }
}

/// Creates a [`FnPlugin`].
pub fn plugin_fn<F>(name: impl Into<String>, register: F) -> FnPlugin
where
    F: Fn(&mut Registry, &PluginContext) -> PluginResult<()> + Send + Sync + 'static,
{
    FnPlugin {
        name: name.into(),
        register: Box::new(register),
    }
}
