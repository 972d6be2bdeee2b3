//! Error taxonomy for sandbox operations.
//!
//! Only [`SandboxError::Provisioning`] ever reaches a caller of this crate
//! directly (from plugin construction). Every other variant is caught at the
//! tool boundary and folded into an error-shaped JSON result.

use thiserror::Error;

/// Errors produced by a [`SandboxClient`](crate::sandbox::SandboxClient).
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The provider rejected the sandbox-creation request (auth failure,
    /// quota, invalid config). Fatal to plugin construction.
    #[error("sandbox provisioning failed: {0}")]
    Provisioning(String),

    /// An operation was attempted with no live sandbox (never created, or
    /// already torn down).
    #[error("no active sandbox")]
    NoSandbox,

    /// The provider API returned a non-success status.
    #[error("daytona api returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The HTTP request itself failed (connect, TLS, client-side timeout).
    #[error("daytona api request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested file does not exist in the sandbox.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The provider responded with a body this crate could not interpret.
    #[error("unexpected response from daytona api: {0}")]
    InvalidResponse(String),
}
