//! `execute_code` tool — run a code snippet inside the sandbox.
//!
//! Python goes through the sandbox's native code-run capability. JavaScript
//! and TypeScript are materialized as a uniquely named temp script and run
//! through the generic command capability (`node` / `ts-node`).

use crate::sandbox::{CodeRunParams, SandboxClient};
use crate::tools::traits::Tool;
use crate::tools::{argv_arg, env_arg};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

const TOOL_NAME: &str = "execute_code";

/// Supported code-run languages.
///
/// A closed set: anything the host passes outside it is rejected before any
/// remote call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Javascript,
    Typescript,
}

impl Language {
    /// Parse a (case-insensitive) language name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "python" => Some(Self::Python),
            "javascript" => Some(Self::Javascript),
            "typescript" => Some(Self::Typescript),
            _ => None,
        }
    }

    /// File extension for a materialized script.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Javascript => "js",
            Self::Typescript => "ts",
        }
    }
}

pub struct ExecuteCodeTool {
    client: Arc<dyn SandboxClient>,
}

impl ExecuteCodeTool {
    pub fn new(client: Arc<dyn SandboxClient>) -> Self {
        Self { client }
    }

    /// Upload the snippet as a temp script, run it, then remove the script.
    async fn run_script(
        &self,
        language: Language,
        code: &str,
        env: Option<&HashMap<String, String>>,
        argv: Option<&Vec<String>>,
        timeout_secs: Option<u64>,
    ) -> Result<Value, crate::error::SandboxError> {
        // Uuid suffix keeps concurrent calls on the shared sandbox from
        // racing on one path.
        let script_path = format!(
            "/tmp/script_{}.{}",
            Uuid::new_v4().simple(),
            language.extension()
        );
        self.client
            .upload_file(&script_path, code.as_bytes())
            .await?;

        let mut command = if language == Language::Javascript {
            format!("node {script_path}")
        } else {
            // ts-node: skip type checking, ignore tsconfig, force commonjs
            format!(
                "ts-node --transpile-only --skipProject \
                 --compilerOptions '{{\"module\":\"commonjs\",\"moduleResolution\":\"node\"}}' \
                 {script_path}"
            )
        };
        if let Some(argv) = argv {
            if !argv.is_empty() {
                command.push(' ');
                command.push_str(&argv.join(" "));
            }
        }

        let response = self.client.exec(&command, None, env, timeout_secs).await?;
        self.client.delete_file(&script_path).await?;

        debug!(exit_code = response.exit_code, "code execution completed");
        Ok(json!({ "result": response.output, "exit_code": response.exit_code }))
    }
}

#[async_trait]
impl Tool for ExecuteCodeTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Execute Python, JavaScript, or TypeScript code inside the sandbox. \
         Provide the code snippet and language. \
         Supported languages: 'python' (default), 'javascript', 'typescript'."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The code snippet to execute."
                },
                "language": {
                    "type": "string",
                    "description": "Programming language: 'python' (default), 'javascript', or 'typescript'.",
                    "enum": ["python", "javascript", "typescript"]
                },
                "env": {
                    "type": "object",
                    "description": "Optional environment variables as key-value pairs."
                },
                "argv": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional command line arguments."
                },
                "timeout": {
                    "type": "integer",
                    "description": "Optional timeout in seconds."
                }
            },
            "required": ["code", "language"]
        })
    }

    async fn execute(&self, args: Value) -> Value {
        let Some(code) = args["code"].as_str() else {
            return json!({ "error": "Missing required parameter: code", "exit_code": -1 });
        };
        let language_arg = args["language"].as_str().unwrap_or("python");
        let env = env_arg(&args);
        let argv = argv_arg(&args);
        let timeout = args["timeout"].as_u64();

        let Some(language) = Language::parse(language_arg) else {
            warn!(language = %language_arg, "unsupported language requested");
            return json!({
                "error": format!("Unsupported language: {}", language_arg.to_lowercase()),
                "exit_code": -1,
            });
        };

        debug!(?language, code_len = code.len(), "executing code");

        let result = match language {
            Language::Python => {
                let params = (env.is_some() || argv.is_some()).then(|| CodeRunParams {
                    env: env.clone(),
                    argv: argv.clone(),
                });
                self.client
                    .run_code(code, params.as_ref(), timeout)
                    .await
                    .map(|response| {
                        debug!(exit_code = response.exit_code, "code execution completed");
                        json!({ "result": response.output, "exit_code": response.exit_code })
                    })
            }
            Language::Javascript | Language::Typescript => {
                self.run_script(language, code, env.as_ref(), argv.as_ref(), timeout)
                    .await
            }
        };

        result.unwrap_or_else(|e| {
            error!(error = %e, "code execution failed");
            json!({ "error": e.to_string(), "exit_code": -1 })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::mock::MockSandboxClient;

    #[test]
    fn language_parse_is_closed() {
        assert_eq!(Language::parse("Python"), Some(Language::Python));
        assert_eq!(Language::parse("typescript"), Some(Language::Typescript));
        assert_eq!(Language::parse("ruby"), None);
    }

    #[tokio::test]
    async fn python_goes_through_run_code() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_ok("hello world\n", 0);
        let tool = ExecuteCodeTool::new(client.clone());

        let result = tool
            .execute(json!({"code": "print('hello world')", "language": "python"}))
            .await;

        assert_eq!(result["exit_code"], 0);
        assert!(result["result"].as_str().unwrap().contains("hello world"));
        let log = client.exec_log.lock();
        assert_eq!(log.len(), 1);
        assert!(log[0].starts_with("run_code:"));
    }

    #[tokio::test]
    async fn javascript_uploads_script_and_runs_node() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_ok("hi from js\n", 0);
        let tool = ExecuteCodeTool::new(client.clone());

        let result = tool
            .execute(json!({"code": "console.log('hi from js')", "language": "javascript"}))
            .await;

        assert_eq!(result["exit_code"], 0);
        let log = client.exec_log.lock();
        assert!(log[0].starts_with("exec:node /tmp/script_"));
        assert!(log[0].ends_with(".js"));
        // Temp script cleaned up after the run.
        let path = log[0].trim_start_matches("exec:node ").to_string();
        drop(log);
        assert!(client.file(&path).is_none());
    }

    #[tokio::test]
    async fn typescript_uses_transpile_only_ts_node() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_ok("hi from ts\n", 0);
        let tool = ExecuteCodeTool::new(client.clone());

        let result = tool
            .execute(json!({"code": "const m: string = 'hi'", "language": "typescript"}))
            .await;

        assert_eq!(result["exit_code"], 0);
        let log = client.exec_log.lock();
        assert!(log[0].contains("ts-node --transpile-only --skipProject"));
        assert!(log[0].contains("\"module\":\"commonjs\""));
        assert!(log[0].contains(".ts"));
    }

    #[tokio::test]
    async fn argv_is_appended_to_script_command() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = ExecuteCodeTool::new(client.clone());

        tool.execute(json!({
            "code": "console.log(process.argv)",
            "language": "javascript",
            "argv": ["--one", "two"],
        }))
        .await;

        let log = client.exec_log.lock();
        assert!(log[0].ends_with(".js --one two"));
    }

    #[tokio::test]
    async fn unsupported_language_makes_no_remote_call() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = ExecuteCodeTool::new(client.clone());

        let result = tool
            .execute(json!({"code": "puts 1", "language": "ruby"}))
            .await;

        assert_eq!(result["exit_code"], -1);
        assert!(result["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported language: ruby"));
        assert!(client.exec_log.lock().is_empty());
    }

    #[tokio::test]
    async fn language_defaults_to_python() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = ExecuteCodeTool::new(client.clone());

        tool.execute(json!({"code": "print(1)"})).await;

        assert!(client.exec_log.lock()[0].starts_with("run_code:"));
    }

    #[tokio::test]
    async fn remote_fault_becomes_error_result() {
        let client = Arc::new(MockSandboxClient::new());
        client.push_exec_err(crate::error::SandboxError::NoSandbox);
        let tool = ExecuteCodeTool::new(client);

        let result = tool.execute(json!({"code": "print(1)"})).await;

        assert_eq!(result["exit_code"], -1);
        assert!(result["error"].is_string());
        assert!(result.get("result").is_none());
    }

    #[tokio::test]
    async fn missing_code_is_error_shaped() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = ExecuteCodeTool::new(client);

        let result = tool.execute(json!({"language": "python"})).await;

        assert_eq!(result["exit_code"], -1);
        assert!(result["error"].as_str().unwrap().contains("code"));
    }

    #[test]
    fn schema_declares_required_fields() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = ExecuteCodeTool::new(client);
        assert_eq!(tool.name(), TOOL_NAME);
        assert!(!tool.is_long_running());
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["code", "language"]));
    }
}
