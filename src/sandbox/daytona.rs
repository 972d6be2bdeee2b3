//! Daytona sandbox provider — HTTP client for the Daytona REST API.
//!
//! One reusable [`DaytonaApiClient`] implements [`SandboxClient`]. Sandbox
//! lifecycle goes through `/sandbox`, everything else through the per-sandbox
//! toolbox endpoints (`/toolbox/{id}/process`, `/toolbox/{id}/files`).

use super::{CodeRunParams, CreateSandboxParams, ExecOutput, SandboxClient, SessionCommandOutput};
use crate::error::SandboxError;
use async_trait::async_trait;
use base64::Engine;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Base URL for the Daytona REST API.
pub const DAYTONA_API_BASE: &str = "https://app.daytona.io/api";

/// Shared HTTP client for Daytona API calls.
pub struct DaytonaApiClient {
    api_key: String,
    api_base: String,
    sandbox_id: Arc<Mutex<Option<String>>>,
    http: reqwest::Client,
}

impl DaytonaApiClient {
    /// Build a client against the default API base.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base(api_key, DAYTONA_API_BASE)
    }

    /// Build a client against a custom API base (tests, self-hosted Daytona).
    pub fn with_base(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            api_key: api_key.into(),
            api_base: api_base.into(),
            sandbox_id: Arc::new(Mutex::new(None)),
            http,
        }
    }

    fn effective_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("DAYTONA_API_KEY").unwrap_or_default()
    }

    fn require_sandbox(&self) -> Result<String, SandboxError> {
        self.sandbox_id.lock().clone().ok_or(SandboxError::NoSandbox)
    }

    fn toolbox_url(&self, sandbox_id: &str, suffix: &str) -> String {
        format!("{}/toolbox/{sandbox_id}/{suffix}", self.api_base)
    }

    /// Read the response body and fail on a non-success status.
    async fn check(resp: reqwest::Response) -> Result<String, SandboxError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable>".to_string());
        if status.is_success() {
            Ok(body)
        } else {
            Err(SandboxError::Api { status, body })
        }
    }

    fn parse(body: &str) -> Result<serde_json::Value, SandboxError> {
        serde_json::from_str(body)
            .map_err(|e| SandboxError::InvalidResponse(format!("{e}\nBody: {body}")))
    }
}

#[async_trait]
impl SandboxClient for DaytonaApiClient {
    async fn create_sandbox(&self, params: &CreateSandboxParams) -> Result<String, SandboxError> {
        let api_key = self.effective_key();
        if api_key.is_empty() {
            return Err(SandboxError::Provisioning(
                "DAYTONA_API_KEY is not set".to_string(),
            ));
        }

        let url = format!("{}/sandbox", self.api_base);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&api_key)
            .json(params)
            .send()
            .await
            .map_err(|e| SandboxError::Provisioning(format!("create request failed: {e}")))?;

        let status = resp.status();
        let body_text = resp
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable>".to_string());
        if !status.is_success() {
            return Err(SandboxError::Provisioning(format!(
                "daytona api returned {status}: {body_text}"
            )));
        }

        let parsed = Self::parse(&body_text)?;
        let sandbox_id = parsed["id"]
            .as_str()
            .or_else(|| parsed["sandboxId"].as_str())
            .unwrap_or("")
            .to_string();
        if sandbox_id.is_empty() {
            return Err(SandboxError::Provisioning(format!(
                "daytona returned no sandbox id. Response: {body_text}"
            )));
        }

        *self.sandbox_id.lock() = Some(sandbox_id.clone());
        info!(sandbox_id = %sandbox_id, "sandbox created");
        Ok(sandbox_id)
    }

    async fn delete_sandbox(&self) -> Result<(), SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = format!("{}/sandbox/{sandbox_id}", self.api_base);

        let resp = self
            .http
            .delete(&url)
            .bearer_auth(self.effective_key())
            .send()
            .await?;

        let status = resp.status();
        // Already-gone sandboxes count as deleted.
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            info!(sandbox_id = %sandbox_id, "sandbox deleted");
            Ok(())
        } else {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            Err(SandboxError::Api { status, body })
        }
    }

    async fn exec(
        &self,
        command: &str,
        cwd: Option<&str>,
        env: Option<&HashMap<String, String>>,
        timeout_secs: Option<u64>,
    ) -> Result<ExecOutput, SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = self.toolbox_url(&sandbox_id, "process/execute");

        let mut body = json!({ "command": command });
        if let Some(cwd) = cwd {
            body["cwd"] = json!(cwd);
        }
        if let Some(env) = env {
            body["env"] = json!(env);
        }
        if let Some(timeout) = timeout_secs {
            body["timeout"] = json!(timeout);
        }

        debug!(sandbox_id = %sandbox_id, command_len = command.len(), "executing command");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.effective_key())
            .json(&body)
            .send()
            .await?;

        let body_text = Self::check(resp).await?;
        let parsed = Self::parse(&body_text)?;

        Ok(ExecOutput {
            output: parsed["result"]
                .as_str()
                .or_else(|| parsed["output"].as_str())
                .unwrap_or("")
                .to_string(),
            exit_code: parsed["exitCode"]
                .as_i64()
                .or_else(|| parsed["exit_code"].as_i64())
                .unwrap_or(0),
        })
    }

    async fn run_code(
        &self,
        code: &str,
        params: Option<&CodeRunParams>,
        timeout_secs: Option<u64>,
    ) -> Result<ExecOutput, SandboxError> {
        // Ship the snippet through base64 so quoting in the code cannot break
        // out of the shell pipeline.
        let encoded = base64::engine::general_purpose::STANDARD.encode(code.as_bytes());
        let mut command = format!("echo '{encoded}' | base64 -d | python3 -u -");

        let env = params.and_then(|p| p.env.as_ref());
        if let Some(argv) = params.and_then(|p| p.argv.as_ref()) {
            if !argv.is_empty() {
                command.push(' ');
                command.push_str(&argv.join(" "));
            }
        }

        self.exec(&command, None, env, timeout_secs).await
    }

    async fn upload_file(&self, path: &str, content: &[u8]) -> Result<(), SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = format!(
            "{}?path={}",
            self.toolbox_url(&sandbox_id, "files/upload"),
            urlencoding::encode(path)
        );

        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(content.to_vec()).file_name(file_name),
        );

        debug!(sandbox_id = %sandbox_id, path = %path, size = content.len(), "uploading file");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.effective_key())
            .multipart(form)
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn download_file(&self, path: &str) -> Result<Vec<u8>, SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = format!(
            "{}?path={}",
            self.toolbox_url(&sandbox_id, "files/download"),
            urlencoding::encode(path)
        );

        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.effective_key())
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SandboxError::FileNotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            return Err(SandboxError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        debug!(sandbox_id = %sandbox_id, path = %path, size = bytes.len(), "file downloaded");
        Ok(bytes.to_vec())
    }

    async fn delete_file(&self, path: &str) -> Result<(), SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = format!(
            "{}?path={}",
            self.toolbox_url(&sandbox_id, "files"),
            urlencoding::encode(path)
        );

        let resp = self
            .http
            .delete(&url)
            .bearer_auth(self.effective_key())
            .send()
            .await?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn create_session(&self, session_id: &str) -> Result<(), SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = self.toolbox_url(&sandbox_id, "process/session");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.effective_key())
            .json(&json!({ "sessionId": session_id }))
            .send()
            .await?;

        Self::check(resp).await?;
        debug!(sandbox_id = %sandbox_id, session_id = %session_id, "session created");
        Ok(())
    }

    async fn exec_in_session(
        &self,
        session_id: &str,
        command: &str,
        run_async: bool,
        timeout_secs: Option<u64>,
    ) -> Result<SessionCommandOutput, SandboxError> {
        let sandbox_id = self.require_sandbox()?;
        let url = self.toolbox_url(&sandbox_id, &format!("process/session/{session_id}/exec"));

        let mut body = json!({ "command": command, "runAsync": run_async });
        if let Some(timeout) = timeout_secs {
            body["timeout"] = json!(timeout);
        }

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.effective_key())
            .json(&body)
            .send()
            .await?;

        let body_text = Self::check(resp).await?;
        let parsed = Self::parse(&body_text)?;

        Ok(SessionCommandOutput {
            output: parsed["output"].as_str().map(ToString::to_string),
            exit_code: parsed["exitCode"]
                .as_i64()
                .or_else(|| parsed["exit_code"].as_i64()),
        })
    }

    fn current_id(&self) -> Option<String> {
        self.sandbox_id.lock().clone()
    }

    fn set_id(&self, id: String) {
        *self.sandbox_id.lock() = Some(id);
    }

    fn clear_id(&self) {
        *self.sandbox_id.lock() = None;
    }
}
