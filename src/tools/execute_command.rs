//! `execute_command` tool — run a shell command inside the sandbox.

use crate::sandbox::SandboxClient;
use crate::tools::env_arg;
use crate::tools::traits::Tool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

const TOOL_NAME: &str = "execute_command";

pub struct ExecuteCommandTool {
    client: Arc<dyn SandboxClient>,
}

impl ExecuteCommandTool {
    pub fn new(client: Arc<dyn SandboxClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Execute a shell command inside the sandbox. Provide the command to run."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute."
                },
                "cwd": {
                    "type": "string",
                    "description": "Optional working directory for the command."
                },
                "env": {
                    "type": "object",
                    "description": "Optional environment variables as key-value pairs."
                },
                "timeout": {
                    "type": "integer",
                    "description": "Optional timeout in seconds."
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value) -> Value {
        let Some(command) = args["command"].as_str() else {
            return json!({ "error": "Missing required parameter: command", "exit_code": -1 });
        };
        let cwd = args["cwd"].as_str();
        let env = env_arg(&args);
        let timeout = args["timeout"].as_u64();

        debug!(command_len = command.len(), "executing command");

        match self.client.exec(command, cwd, env.as_ref(), timeout).await {
            Ok(response) => {
                debug!(exit_code = response.exit_code, "command completed");
                json!({ "result": response.output, "exit_code": response.exit_code })
            }
            Err(e) => {
                error!(error = %e, "command execution failed");
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
    async fn successful_command_returns_result_shape() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_ok("total 0\n", 0);
        let tool = ExecuteCommandTool::new(client.clone());

        let result = tool.execute(json!({"command": "ls -la"})).await;

        assert_eq!(result["exit_code"], 0);
        assert_eq!(result["result"], "total 0\n");
        assert!(result.get("error").is_none());
        assert_eq!(client.exec_log.lock()[0], "exec:ls -la");
    }

    #[tokio::test]
    async fn nonzero_exit_is_still_success_shaped() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_ok("grep: no match\n", 1);
        let tool = ExecuteCommandTool::new(client);

        let result = tool.execute(json!({"command": "grep x y"})).await;

        assert_eq!(result["exit_code"], 1);
        assert!(result.get("error").is_none());
    }

    #[tokio::test]
    async fn provider_timeout_is_error_shaped() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_err(crate::error::SandboxError::Api {
            status: reqwest::StatusCode::REQUEST_TIMEOUT,
            body: "command timed out after 2s".to_string(),
        });
        let tool = ExecuteCommandTool::new(client);

        let result = tool
            .execute(json!({"command": "sleep 10", "timeout": 2}))
            .await;

        assert_eq!(result["exit_code"], -1);
        assert!(result["error"].as_str().unwrap().contains("timed out"));
        assert!(result.get("result").is_none());
    }

    #[tokio::test]
    async fn missing_command_is_error_shaped() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = ExecuteCommandTool::new(client.clone());

        let result = tool.execute(json!({})).await;

        assert_eq!(result["exit_code"], -1);
        assert!(result["error"].as_str().unwrap().contains("command"));
        assert!(client.exec_log.lock().is_empty());
    }

    #[test]
    fn tool_metadata() {
        let tool = ExecuteCommandTool::new(Arc::new(MockSandboxClient::new()));
        assert_eq!(tool.name(), TOOL_NAME);
        assert_eq!(tool.parameters_schema()["required"], json!(["command"]));
    }
}
