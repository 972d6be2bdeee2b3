//! Sandbox abstraction layer.
//!
//! Defines the [`SandboxClient`] trait that the tools and the plugin operate
//! against, plus the request/response types shared by all providers. One
//! provider ships with this crate:
//!
//! - [`daytona::DaytonaApiClient`] — Daytona cloud sandbox (requires
//!   `DAYTONA_API_KEY` or an explicit key in [`PluginConfig`])
//!
//! The trait is object-safe so an alternative backend with the same
//! capability set can be injected via
//! [`DaytonaPlugin::with_client`](crate::plugin::DaytonaPlugin::with_client).
//!
//! [`PluginConfig`]: crate::config::PluginConfig

pub mod daytona;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::SandboxError;

/// Parameters for provisioning a sandbox. Serializes directly as the
/// provider's create-request body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSandboxParams {
    /// Optional display name for the sandbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Environment variables applied to every process spawned in the sandbox.
    #[serde(rename = "env")]
    pub env_vars: HashMap<String, String>,
    /// Free-form metadata for provider-side bookkeeping.
    pub labels: HashMap<String, String>,
    /// Minutes of idleness before the provider suspends the sandbox.
    /// 0 disables auto-stop.
    pub auto_stop_interval: u32,
    /// Minutes after auto-stop before the provider deletes the sandbox.
    /// Negative disables auto-delete.
    pub auto_delete_interval: i64,
}

/// Optional parameters for a native code run.
#[derive(Debug, Clone, Default)]
pub struct CodeRunParams {
    /// Environment variables for the run.
    pub env: Option<HashMap<String, String>>,
    /// Positional arguments passed to the script.
    pub argv: Option<Vec<String>>,
}

/// Output of a command or code run: combined stdout+stderr and exit code.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub output: String,
    pub exit_code: i64,
}

/// Output of a command submitted to a long-running session.
///
/// Both fields may be absent when the command was submitted asynchronously
/// and has not finished yet.
#[derive(Debug, Clone, Default)]
pub struct SessionCommandOutput {
    pub output: Option<String>,
    pub exit_code: Option<i64>,
}

/// Provider-agnostic sandbox interface.
///
/// All remote operations require a live sandbox (provisioned via
/// [`create_sandbox`](SandboxClient::create_sandbox)) and return
/// [`SandboxError::NoSandbox`] otherwise. The `current_id` / `set_id` /
/// `clear_id` helpers manage the live sandbox identifier in
/// interior-mutable state. No retry or backoff happens here; timeouts are
/// forwarded to the provider, which enforces them.
#[async_trait]
pub trait SandboxClient: Send + Sync {
    /// Provision a sandbox. Stores and returns the provider-assigned ID.
    async fn create_sandbox(&self, params: &CreateSandboxParams) -> Result<String, SandboxError>;

    /// Request deletion of the active sandbox. The ID slot is left for the
    /// caller to clear so a failed delete is never retried against a
    /// possibly-gone sandbox.
    async fn delete_sandbox(&self) -> Result<(), SandboxError>;

    /// Run a shell command inside the sandbox.
    async fn exec(
        &self,
        command: &str,
        cwd: Option<&str>,
        env: Option<&HashMap<String, String>>,
        timeout_secs: Option<u64>,
    ) -> Result<ExecOutput, SandboxError>;

    /// Run a Python snippet via the sandbox's native code-run capability.
    async fn run_code(
        &self,
        code: &str,
        params: Option<&CodeRunParams>,
        timeout_secs: Option<u64>,
    ) -> Result<ExecOutput, SandboxError>;

    /// Write raw bytes to a path inside the sandbox.
    async fn upload_file(&self, path: &str, content: &[u8]) -> Result<(), SandboxError>;

    /// Read raw bytes from a path inside the sandbox.
    ///
    /// A missing file is [`SandboxError::FileNotFound`].
    async fn download_file(&self, path: &str) -> Result<Vec<u8>, SandboxError>;

    /// Delete a file inside the sandbox.
    async fn delete_file(&self, path: &str) -> Result<(), SandboxError>;

    /// Create a named long-running session.
    async fn create_session(&self, session_id: &str) -> Result<(), SandboxError>;

    /// Submit a command to a session. With `run_async` the call returns as
    /// soon as the provider accepts the command.
    async fn exec_in_session(
        &self,
        session_id: &str,
        command: &str,
        run_async: bool,
        timeout_secs: Option<u64>,
    ) -> Result<SessionCommandOutput, SandboxError>;

    /// Return the current sandbox ID, if any.
    fn current_id(&self) -> Option<String>;

    /// Store a new sandbox ID.
    fn set_id(&self, id: String);

    /// Clear the current ID (sandbox has been torn down).
    fn clear_id(&self);
}
