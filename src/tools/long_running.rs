//! `start_long_running_command` tool — launch a command in a provider-side
//! session (e.g. a dev server) without blocking the agent turn.
//!
//! The returned session id is the only handle the caller gets; no local
//! registry of live sessions is kept.

use crate::sandbox::SandboxClient;
use crate::tools::traits::Tool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

const TOOL_NAME: &str = "start_long_running_command";

/// Prefix of every generated session id.
pub const SESSION_ID_PREFIX: &str = "long-running-";

pub struct StartLongRunningCommandTool {
    client: Arc<dyn SandboxClient>,
}

impl StartLongRunningCommandTool {
    pub fn new(client: Arc<dyn SandboxClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for StartLongRunningCommandTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Start a long-running command in the sandbox \
         (e.g. npm run dev, python server.py). \
         Returns a session ID that can be used to check status or stop the process."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The long-running command to start."
                },
                "timeout": {
                    "type": "integer",
                    "description": "Optional timeout in seconds for the command."
                }
            },
            "required": ["command"]
        })
    }

    fn is_long_running(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Value {
        let Some(command) = args["command"].as_str() else {
            return json!({ "error": "Missing required parameter: command", "exit_code": -1 });
        };
        let timeout = args["timeout"].as_u64();

        // Uuid per call: concurrent starts on the shared sandbox must not
        // collide on one session name.
        let session_id = format!("{SESSION_ID_PREFIX}{}", Uuid::new_v4());

        debug!(session_id = %session_id, command_len = command.len(), "starting long-running command");

        let result = async {
            self.client.create_session(&session_id).await?;
            self.client
                .exec_in_session(&session_id, command, true, timeout)
                .await
        }
        .await;

        match result {
            Ok(response) => {
                debug!(session_id = %session_id, "long-running command started");
                json!({
                    "session_id": session_id,
                    "output": response.output.unwrap_or_default(),
                    "exit_code": response.exit_code,
                })
            }
            Err(e) => {
                error!(error = %e, "failed to start long-running command");
                json!({ "error": e.to_string(), "exit_code": -1 })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::mock::MockSandboxClient;

    #[tokio::test]
    async fn start_returns_prefixed_session_id() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = StartLongRunningCommandTool::new(client.clone());

        let result = tool.execute(json!({"command": "npm run dev"})).await;

        let session_id = result["session_id"].as_str().unwrap();
        assert!(session_id.starts_with(SESSION_ID_PREFIX));
        assert_eq!(result["output"], "");
        assert!(result["exit_code"].is_null());
        assert_eq!(client.sessions.lock()[0], session_id);
    }

    #[tokio::test]
    async fn session_ids_are_unique_per_call() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = StartLongRunningCommandTool::new(client);

        let first = tool.execute(json!({"command": "sleep 1000"})).await;
        let second = tool.execute(json!({"command": "sleep 1000"})).await;

        assert_ne!(first["session_id"], second["session_id"]);
    }

    #[tokio::test]
    async fn fault_is_error_shaped() {
        let client = Arc::new(MockSandboxClient::new());
        client.clear_id();
        let tool = StartLongRunningCommandTool::new(client);

        let result = tool.execute(json!({"command": "npm run dev"})).await;

        assert_eq!(result["exit_code"], -1);
        assert!(result["error"].is_string());
        assert!(result.get("session_id").is_none());
    }

    #[test]
    fn marked_long_running() {
        let tool = StartLongRunningCommandTool::new(Arc::new(MockSandboxClient::new()));
        assert_eq!(tool.name(), TOOL_NAME);
        assert!(tool.is_long_running());
        assert_eq!(tool.parameters_schema()["required"], json!(["command"]));
    }
}
