use std::ffi::OsStr;
use std::process::Command;
use tracing::debug;

use crate::error::{BuildError, BuildResult};

/// Runs a tool to completion. A spawn failure or non-zero exit becomes
/// `ExternalTool` carrying the tool's stderr.
pub fn run_tool<I, S>(tool: &str, args: I) -> BuildResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(tool);
    command.args(args);
    debug!("Running {:?}", command);

    let output = command.output().map_err(|e| BuildError::ExternalTool {
        tool: tool.to_string(),
        status: "not started".to_string(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(BuildError::ExternalTool {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let err = run_tool("svg2xcur-no-such-tool", ["--version"]).unwrap_err();
        match err {
            BuildError::ExternalTool { tool, status, .. } => {
                assert_eq!(tool, "svg2xcur-no-such-tool");
                assert_eq!(status, "not started");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool() {
        let err = run_tool("sh", ["-c", "echo broken >&2; exit 3"]).unwrap_err();
        match err {
            BuildError::ExternalTool { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(run_tool("sh", ["-c", "exit 0"]).is_ok());
    }
}
