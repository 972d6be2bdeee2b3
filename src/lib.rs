//! Daytona sandbox tools for agent frameworks.
//!
//! Exposes a remote Daytona code-execution sandbox as a set of callable
//! tools plus a lifecycle plugin. The crate implements no sandboxing itself;
//! it is a thin adapter between a host agent framework's tool-call shapes
//! and the Daytona REST API:
//!
//! - [`DaytonaPlugin`] provisions one sandbox at construction, hands out the
//!   five tools bound to it, and reacts to tool failures through the
//!   [`AgentPlugin`] hook surface.
//! - The tools ([`ExecuteCodeTool`], [`ExecuteCommandTool`],
//!   [`UploadFileTool`], [`ReadFileTool`], [`StartLongRunningCommandTool`])
//!   translate call arguments into [`SandboxClient`] calls and fold every
//!   fault into an error-shaped result — they never return an error to the
//!   host.
//!
//! # Usage
//!
//! ```no_run
//! use daytona_tools::{DaytonaPlugin, PluginConfig};
//!
//! # async fn run() -> Result<(), daytona_tools::SandboxError> {
//! let plugin = DaytonaPlugin::new(
//!     PluginConfig::new()
//!         .with_sandbox_name("agent-sandbox")
//!         .with_env_var("DEBUG", "true"),
//! )
//! .await?;
//!
//! for tool in plugin.tools() {
//!     // register with the host framework
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//!
//! // ... agent turns run, the host invokes AgentPlugin hooks ...
//!
//! plugin.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! A single failed tool call destroys the shared sandbox by default (every
//! later call then fails); configure [`TeardownPolicy`] to relax that.

pub mod config;
pub mod error;
pub mod plugin;
pub mod sandbox;
pub mod tools;

pub use config::{PluginConfig, TeardownPolicy};
pub use error::SandboxError;
pub use plugin::{AgentPlugin, DaytonaPlugin};
pub use sandbox::daytona::DaytonaApiClient;
pub use sandbox::{
    CodeRunParams, CreateSandboxParams, ExecOutput, SandboxClient, SessionCommandOutput,
};
pub use tools::{
    ExecuteCodeTool, ExecuteCommandTool, ReadFileTool, StartLongRunningCommandTool, Tool,
    UploadFileTool,
};
