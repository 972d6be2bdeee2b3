//! Plugin configuration.

use std::collections::HashMap;

use crate::sandbox::daytona::DAYTONA_API_BASE;
use crate::sandbox::CreateSandboxParams;

/// Default idle minutes before the provider suspends the sandbox.
pub const DEFAULT_AUTO_STOP_INTERVAL: u32 = 15;

/// What the lifecycle hook does when a tool returns an error-shaped result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownPolicy {
    /// Destroy the shared sandbox after `threshold` error-shaped results.
    /// The default threshold of 1 tears down on the first failure: one bad
    /// tool call poisons the shared environment for every tool.
    OnFailure { threshold: u32 },
    /// Never tear down from the hook; only explicit `destroy()`/`close()`.
    Manual,
}

impl Default for TeardownPolicy {
    fn default() -> Self {
        Self::OnFailure { threshold: 1 }
    }
}

/// Configuration for [`DaytonaPlugin`](crate::plugin::DaytonaPlugin).
///
/// All fields have working defaults; the API key falls back to the
/// `DAYTONA_API_KEY` environment variable when not set here.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Daytona API key. Empty string defers to `DAYTONA_API_KEY`.
    pub api_key: String,
    /// Base URL of the Daytona API.
    pub api_base: String,
    /// Name identifier for the plugin instance.
    pub plugin_name: String,
    /// Optional display name for the sandbox.
    pub sandbox_name: Option<String>,
    /// Environment variables for every process spawned in the sandbox.
    pub env_vars: HashMap<String, String>,
    /// Free-form labels for provider-side bookkeeping.
    pub labels: HashMap<String, String>,
    /// Minutes of idleness before auto-stop. 0 disables.
    pub auto_stop_interval: u32,
    /// Minutes after auto-stop before auto-delete. Negative disables.
    pub auto_delete_interval: i64,
    /// Failure policy applied by the after-tool hook.
    pub teardown: TeardownPolicy,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DAYTONA_API_BASE.to_string(),
            plugin_name: "daytona_plugin".to_string(),
            sandbox_name: None,
            env_vars: HashMap::new(),
            labels: HashMap::new(),
            auto_stop_interval: DEFAULT_AUTO_STOP_INTERVAL,
            auto_delete_interval: -1,
            teardown: TeardownPolicy::default(),
        }
    }
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_plugin_name(mut self, name: impl Into<String>) -> Self {
        self.plugin_name = name.into();
        self
    }

    pub fn with_sandbox_name(mut self, name: impl Into<String>) -> Self {
        self.sandbox_name = Some(name.into());
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_auto_stop_interval(mut self, minutes: u32) -> Self {
        self.auto_stop_interval = minutes;
        self
    }

    pub fn with_auto_delete_interval(mut self, minutes: i64) -> Self {
        self.auto_delete_interval = minutes;
        self
    }

    pub fn with_teardown_policy(mut self, policy: TeardownPolicy) -> Self {
        self.teardown = policy;
        self
    }

    pub(crate) fn sandbox_params(&self) -> CreateSandboxParams {
        CreateSandboxParams {
            name: self.sandbox_name.clone(),
            env_vars: self.env_vars.clone(),
            labels: self.labels.clone(),
            auto_stop_interval: self.auto_stop_interval,
            auto_delete_interval: self.auto_delete_interval,
        }
    }
}
