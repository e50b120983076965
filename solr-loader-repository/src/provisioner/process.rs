//! Process-backed command runner.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::errors::ProvisionError;
use crate::interfaces::{CommandOutput, CommandRunner};

/// Runs commands as child processes, capturing their output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput, ProvisionError> {
        debug!(program = %program.display(), ?args, "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| ProvisionError::spawn(format!("{}: {}", program.display(), e)))?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
