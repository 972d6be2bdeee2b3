//! `upload_file` tool — write text content to a file in the sandbox.

use crate::sandbox::SandboxClient;
use crate::tools::traits::Tool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

const TOOL_NAME: &str = "upload_file";

pub struct UploadFileTool {
    client: Arc<dyn SandboxClient>,
}

impl UploadFileTool {
    pub fn new(client: Arc<dyn SandboxClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UploadFileTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Upload a file to the sandbox. Provide the file path and content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The destination path in the sandbox."
                },
                "content": {
                    "type": "string",
                    "description": "The file content to upload."
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, args: Value) -> Value {
        let Some(file_path) = args["file_path"].as_str() else {
            return json!({ "error": "Missing required parameter: file_path", "success": false });
        };
        let Some(content) = args["content"].as_str() else {
            return json!({ "error": "Missing required parameter: content", "success": false });
        };

        debug!(path = %file_path, size = content.len(), "uploading file");

        match self.client.upload_file(file_path, content.as_bytes()).await {
            Ok(()) => {
                debug!(path = %file_path, "file uploaded");
                json!({ "success": true, "path": file_path })
            }
            Err(e) => {
                error!(path = %file_path, error = %e, "file upload failed");
                json!({ "error": e.to_string(), "success": false })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::mock::MockSandboxClient;

    #[tokio::test]
    async fn upload_stores_utf8_bytes() {
        let client = Arc::new(MockSandboxClient::new());
        let tool = UploadFileTool::new(client.clone());

        let result = tool
            .execute(json!({"file_path": "/tmp/hello.txt", "content": "héllo"}))
            .await;

        assert_eq!(result["success"], true);
        assert_eq!(result["path"], "/tmp/hello.txt");
        assert_eq!(
            client.file("/tmp/hello.txt").unwrap(),
            "héllo".as_bytes().to_vec()
        );
    }

    #[tokio::test]
    async fn missing_content_is_error_shaped() {
        let tool = UploadFileTool::new(Arc::new(MockSandboxClient::new()));

        let result = tool.execute(json!({"file_path": "/tmp/x"})).await;

        assert_eq!(result["success"], false);
        assert!(result["error"].as_str().unwrap().contains("content"));
    }

    #[tokio::test]
    async fn fault_is_error_shaped() {
        let client = Arc::new(MockSandboxClient::new());
        client.clear_id();
        let tool = UploadFileTool::new(client);

        let result = tool
            .execute(json!({"file_path": "/tmp/x", "content": "y"}))
            .await;

        assert_eq!(result["success"], false);
        assert!(result["error"].is_string());
    }

    #[test]
    fn tool_metadata() {
        let tool = UploadFileTool::new(Arc::new(MockSandboxClient::new()));
        assert_eq!(tool.name(), TOOL_NAME);
        assert_eq!(
            tool.parameters_schema()["required"],
            json!(["file_path", "content"])
        );
    }
}
