//! Sandbox tools exposed to the host agent framework.
//!
//! Five thin adapters over the [`SandboxClient`](crate::sandbox::SandboxClient)
//! trait. Each converts the framework's call-argument object into a sandbox
//! call and the result (or fault) back into a result object. Faults never
//! cross the tool boundary as errors.

pub mod execute_code;
pub mod execute_command;
pub mod long_running;
pub mod read_file;
pub mod traits;
pub mod upload_file;

pub use execute_code::{ExecuteCodeTool, Language};
pub use execute_command::ExecuteCommandTool;
pub use long_running::StartLongRunningCommandTool;
pub use read_file::ReadFileTool;
pub use traits::Tool;
pub use upload_file::UploadFileTool;

use serde_json::Value;
use std::collections::HashMap;

/// Tool name constants for reference.
pub const TOOL_EXECUTE_CODE: &str = "execute_code";
pub const TOOL_EXECUTE_COMMAND: &str = "execute_command";
pub const TOOL_UPLOAD_FILE: &str = "upload_file";
pub const TOOL_READ_FILE: &str = "read_file";
pub const TOOL_START_LONG_RUNNING_COMMAND: &str = "start_long_running_command";

/// Extract an optional `env` object argument as a string map.
pub(crate) fn env_arg(args: &Value) -> Option<HashMap<String, String>> {
    let obj = args["env"].as_object()?;
    Some(
        obj.iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
    )
}

/// Extract an optional `argv` array argument as a string vector.
pub(crate) fn argv_arg(args: &Value) -> Option<Vec<String>> {
    let arr = args["argv"].as_array()?;
    Some(
        arr.iter()
            .filter_map(|v| v.as_str().map(ToString::to_string))
            .collect(),
    )
}
