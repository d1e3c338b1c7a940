//! Local artifact builds

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Run a build command through `sh -c` inside `workdir`
///
/// The command's stdout and stderr are streamed to the current process.
///
/// # Errors
///
/// - [`Error::Command`]: the shell could not be started or the command
///   exited with a non-zero status
pub async fn run_build_command(workdir: &Path, command: &str) -> Result<()> {
    if command.trim().is_empty() {
        return Err(Error::invalid_input("Build command cannot be empty"));
    }

    info!(workdir = %workdir.display(), command, "running build command");

    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| Error::command(format!("failed to start '{}': {}", command, e)))?;

    if !status.success() {
        warn!(command, %status, "build command failed");
        return Err(Error::command(format!("'{}' exited with {}", command, status)));
    }

    Ok(())
}
