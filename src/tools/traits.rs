//! Tool trait — the contract between tools and the host agent framework.

use async_trait::async_trait;
use serde_json::Value;

/// A callable tool exposed to the host framework.
///
/// `execute` never fails: any fault during the underlying sandbox call is
/// folded into an error-shaped result object (an `error` field plus a
/// tool-appropriate sentinel such as `exit_code: -1`). The host's declared
/// schema is advisory; tools re-check only their required fields.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, as declared to the host framework.
    fn name(&self) -> &str;

    /// Human/model-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Whether the host should treat this tool as long-running and not block
    /// its turn awaiting natural completion.
    fn is_long_running(&self) -> bool {
        false
    }

    /// Run the tool. Returns either a success-shaped or an error-shaped
    /// result object — exactly one of the two, never an exception.
    async fn execute(&self, args: Value) -> Value;
}
