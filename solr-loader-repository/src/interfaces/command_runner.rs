//! Command runner trait definition.
//!
//! Collections are created through the server's own command-line tool. This
//! trait hides process execution so provisioning can be tested without
//! spawning anything.

use async_trait::async_trait;
use std::path::Path;

use crate::errors::ProvisionError;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Describe how the command finished, for error reporting.
    pub fn status_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an external program to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to finish.
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutput)` - The command ran; check `success` for its outcome
    /// * `Err(ProvisionError::SpawnError)` - If the program could not be started
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput, ProvisionError>;
}
