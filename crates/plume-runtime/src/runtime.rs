//! The host entry point.
//!
//! A [`PlumeRuntime`] owns the registry, the dispatcher configured from
//! `dispatch.disabled`, and the host [`Api`]. Building it installs plugins
//! in order; afterwards the host feeds it events.
//!
//! ```rust,ignore
//! use plume_runtime::{PlumeRuntime, config::ConfigLoader};
//!
//! let runtime = PlumeRuntime::builder()
//!     .config_loader(ConfigLoader::new())
//!     .api(Arc::new(MyHostApi::connect()?))
//!     .plugin(echo_plugin())
//!     .with_static_handlers(true)
//!     .with_logging(true)
//!     .build()?;
//!
//! for line in incoming_payloads {
//!     runtime.dispatch_json(&line)?;
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use plume_core::{Api, Event, MessageEvent, NoticeEvent, RequestEvent};
use plume_framework::{DispatchReport, Dispatcher, Plugin, PluginContext, Registry};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, PlumeConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

// ============================================================================
// PlumeRuntime
// ============================================================================

pub struct PlumeRuntime {
    config: PlumeConfig,
    registry: Registry,
    dispatcher: Dispatcher,
    api: Arc<dyn Api>,
    plugins: Vec<String>,
}

impl PlumeRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &PlumeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registrations made after build.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn api(&self) -> &Arc<dyn Api> {
        &self.api
    }

    /// Names of the installed plugins, in installation order.
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Runs every matching handler for `event`.
    pub fn dispatch(&self, event: &Event) -> DispatchReport {
        self.dispatcher.dispatch(&self.registry, event, self.api.as_ref())
    }

    /// Parses a OneBot payload and dispatches it.
    ///
    /// Payloads that are not message, notice or request events yield
    /// [`RuntimeError::Event`].
    pub fn dispatch_json(&self, raw: &str) -> RuntimeResult<DispatchReport> {
        let event = Event::from_json(raw).inspect_err(|e| debug!(error = %e, "Dropping payload"))?;
        Ok(self.dispatch(&event))
    }
}

impl fmt::Debug for PlumeRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlumeRuntime")
            .field("plugins", &self.plugins)
            .field("handlers", &self.registry.len())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RuntimeBuilder
// ============================================================================

/// Builder for [`PlumeRuntime`].
///
/// Without [`config`](Self::config) or [`config_loader`](Self::config_loader)
/// the default configuration is used; no files are read.
pub struct RuntimeBuilder {
    config: Option<PlumeConfig>,
    loader: Option<ConfigLoader>,
    api: Option<Arc<dyn Api>>,
    plugins: Vec<Box<dyn Plugin>>,
    static_handlers: bool,
    init_logging: bool,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            loader: None,
            api: None,
            plugins: Vec::new(),
            static_handlers: false,
            init_logging: false,
        }
    }

    /// Uses an already loaded configuration.
    pub fn config(mut self, config: PlumeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the configuration with `loader` at build time.
    pub fn config_loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the host API. Required.
    pub fn api(mut self, api: Arc<dyn Api>) -> Self {
        self.api = Some(api);
        self
    }

    /// Adds a plugin. Plugins are installed in the order they are added.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Applies the `#[on_*]` declarations before any plugin is installed.
    pub fn with_static_handlers(mut self, enabled: bool) -> Self {
        self.static_handlers = enabled;
        self
    }

    /// Installs the global log subscriber from `logging` settings.
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.init_logging = enabled;
        self
    }

    pub fn build(self) -> RuntimeResult<PlumeRuntime> {
        let config = match (self.config, self.loader) {
            (Some(config), _) => {
                config.validate()?;
                config
            }
            (None, Some(loader)) => loader.load()?,
            (None, None) => PlumeConfig::default(),
        };

        let api = self.api.ok_or(RuntimeError::MissingApi)?;

        if self.init_logging {
            logging::init_from_config(&config.logging);
        }
        let mut registry = Registry::new();

        if self.static_handlers {
            registry.register_static();
        }

        let mut plugins = Vec::with_capacity(self.plugins.len());
        for plugin in &self.plugins {
            let name = plugin.name();
            let ctx = PluginContext::new(name, config.plugin_section(name));
            let before = registry.len();

            plugin
                .register(&mut registry, &ctx)
                .inspect_err(|e| error!(plugin = %name, error = %e, "Plugin failed to register"))?;

            info!(
                plugin = %name,
                added = registry.len().saturating_sub(before),
                "Plugin installed"
            );
            plugins.push(name.to_string());
        }

        for section in config.plugins.keys() {
            if !plugins.contains(section) {
                warn!(plugin = %section, "Configuration section for unknown plugin");
            }
        }

        let dispatcher = Dispatcher::with_disabled(config.dispatch.disabled.iter().cloned());
        for name in &config.dispatch.disabled {
            if !is_registered(&registry, name) {
                warn!(handler = %name, "Disabled handler is not registered");
            }
        }

        info!(
            handlers = registry.len(),
            plugins = plugins.len(),
            disabled = config.dispatch.disabled.len(),
            "Runtime ready"
        );

        Ok(PlumeRuntime {
            config,
            registry,
            dispatcher,
            api,
            plugins,
        })
    }
}

fn is_registered(registry: &Registry, name: &str) -> bool {
    registry.contains::<MessageEvent>(name)
        || registry.contains::<NoticeEvent>(name)
        || registry.contains::<RequestEvent>(name)
}
