//! `read_file` tool — read a file from the sandbox as UTF-8 text.

use crate::sandbox::SandboxClient;
use crate::tools::traits::Tool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

const TOOL_NAME: &str = "read_file";

pub struct ReadFileTool {
    client: Arc<dyn SandboxClient>,
}

impl ReadFileTool {
    pub fn new(client: Arc<dyn SandboxClient>) -> Self {
        Self { client }
    }

    async fn read_text(&self, path: &str) -> Result<String, String> {
        let bytes = self
            .client
            .download_file(path)
            .await
            .map_err(|e| e.to_string())?;
        String::from_utf8(bytes).map_err(|e| format!("file is not valid UTF-8: {e}"))
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Read a file from the sandbox. Provide the file path."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path of the file to read."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, args: Value) -> Value {
        let Some(file_path) = args["file_path"].as_str() else {
            return json!({ "error": "Missing required parameter: file_path", "content": null });
        };

        debug!(path = %file_path, "reading file");

        match self.read_text(file_path).await {
            Ok(content) => {
                debug!(path = %file_path, size = content.len(), "file read");
                json!({ "content": content, "path": file_path })
            }
            Err(e) => {
                error!(path = %file_path, error = %e, "file read failed");
                json!({ "error": e, "content": null })
            }
        }
    }
}
