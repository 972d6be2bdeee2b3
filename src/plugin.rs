//! Plugin: sandbox lifecycle management plus the host framework hook surface.
//!
//! [`DaytonaPlugin`] provisions one sandbox at construction and shares it
//! across the five tools. The host drives the [`AgentPlugin`] hooks around
//! each agent turn and tool call; the after-tool hook watches results for
//! the failure shape and tears the sandbox down per the configured
//! [`TeardownPolicy`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{PluginConfig, TeardownPolicy};
use crate::error::SandboxError;
use crate::sandbox::daytona::DaytonaApiClient;
use crate::sandbox::SandboxClient;
use crate::tools::{
    ExecuteCodeTool, ExecuteCommandTool, ReadFileTool, StartLongRunningCommandTool, Tool,
    UploadFileTool,
};

/// Lifecycle hooks a host agent framework invokes around agent turns and
/// tool calls.
///
/// A `Some` return from a hook overrides the host's default content/result;
/// `None` means pass through. All hooks default to pass-through.
#[async_trait]
pub trait AgentPlugin: Send + Sync {
    /// Name identifier for this plugin instance.
    fn name(&self) -> &str;

    /// Called before the agent starts processing.
    async fn before_agent(&self) -> Option<Value> {
        None
    }

    /// Called after the agent finishes processing.
    async fn after_agent(&self) -> Option<Value> {
        None
    }

    /// Called before a tool is executed.
    async fn before_tool(&self, _tool_name: &str, _args: &Value) -> Option<Value> {
        None
    }

    /// Called after a tool is executed, with the result it produced.
    async fn after_tool(&self, _tool_name: &str, _args: &Value, _result: &Value) -> Option<Value> {
        None
    }
}

/// Plugin for code execution in Daytona sandboxes.
///
/// The sandbox is created once during construction and shared across all
/// tools for efficiency and state persistence. Destruction happens at most
/// once: explicitly via [`destroy`](Self::destroy)/[`close`](Self::close),
/// or from the after-tool hook when a tool reports an error (subject to the
/// configured [`TeardownPolicy`]).
pub struct DaytonaPlugin {
    name: String,
    client: Arc<dyn SandboxClient>,
    teardown: TeardownPolicy,
    failures: AtomicU32,
}

impl DaytonaPlugin {
    /// Provision a sandbox with the Daytona provider and build the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Provisioning`] when the provider rejects the
    /// request; no plugin (and no tools) exist in that case.
    pub async fn new(config: PluginConfig) -> Result<Self, SandboxError> {
        let client = Arc::new(DaytonaApiClient::with_base(
            config.api_key.clone(),
            config.api_base.clone(),
        ));
        Self::with_client(config, client).await
    }

    /// Provision a sandbox against any [`SandboxClient`] backend.
    pub async fn with_client(
        config: PluginConfig,
        client: Arc<dyn SandboxClient>,
    ) -> Result<Self, SandboxError> {
        let sandbox_id = client.create_sandbox(&config.sandbox_params()).await?;
        info!(plugin = %config.plugin_name, sandbox_id = %sandbox_id, "sandbox provisioned");

        Ok(Self {
            name: config.plugin_name,
            client,
            teardown: config.teardown,
            failures: AtomicU32::new(0),
        })
    }

    /// All tools, bound to the shared sandbox. Same set on every call.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(ExecuteCodeTool::new(self.client.clone())),
            Arc::new(ExecuteCommandTool::new(self.client.clone())),
            Arc::new(UploadFileTool::new(self.client.clone())),
            Arc::new(ReadFileTool::new(self.client.clone())),
            Arc::new(StartLongRunningCommandTool::new(self.client.clone())),
        ]
    }

    /// ID of the live sandbox, or `None` once torn down.
    pub fn sandbox_id(&self) -> Option<String> {
        self.client.current_id()
    }

    /// Destroy the sandbox. Idempotent: a second call is a silent no-op.
    ///
    /// A failed provider-side delete is logged and swallowed — teardown must
    /// not crash a cleanup path — and the local reference is cleared either
    /// way so no retry ever targets a possibly-gone sandbox.
    pub async fn destroy(&self) {
        let Some(sandbox_id) = self.client.current_id() else {
            return;
        };

        info!(sandbox_id = %sandbox_id, "deleting sandbox");
        match self.client.delete_sandbox().await {
            Ok(()) => info!(sandbox_id = %sandbox_id, "sandbox deleted"),
            Err(e) => warn!(sandbox_id = %sandbox_id, error = %e, "failed to delete sandbox"),
        }
        self.client.clear_id();
    }

    /// Clean up the sandbox. Equivalent to [`destroy`](Self::destroy);
    /// exists for hosts that drive a scoped shutdown protocol.
    pub async fn close(&self) {
        self.destroy().await;
    }
}

#[async_trait]
impl AgentPlugin for DaytonaPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn after_tool(&self, tool_name: &str, _args: &Value, result: &Value) -> Option<Value> {
        let Some(error) = result.get("error") else {
            return None;
        };
        warn!(tool = %tool_name, error = %error, "tool failed");

        match self.teardown {
            TeardownPolicy::Manual => {}
            TeardownPolicy::OnFailure { threshold } => {
                let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= threshold {
                    self.destroy().await;
                }
            }
        }
        None
    }
}

impl Drop for DaytonaPlugin {
    fn drop(&mut self) {
        // Async deletion cannot run here; the provider's auto-stop /
        // auto-delete intervals are the backstop for forgotten close() calls.
        if let Some(id) = self.client.current_id() {
            warn!(sandbox_id = %id, "plugin dropped with live sandbox; call close() to delete it");
        }
    }
}
