// src/exec/backend.rs

//! Pluggable action abstraction.
//!
//! The engine only needs the capability "run the configured action": no
//! arguments, and nothing it inspects beyond success or failure, which the
//! dispatcher logs. Production code uses [`CommandRunner`]; tests provide
//! implementations that count invocations instead of spawning processes.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{FileWatcherError, Result};

/// Trait abstracting what happens when the watched files change.
pub trait ActionRunner: Send + Sync + 'static {
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Runs an external command, split on whitespace into program and arguments.
///
/// No shell is involved, so quoting and pipes are not interpreted.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    /// Fails with a config error if `command` contains no program name.
    pub fn new(command: &str) -> Result<Self> {
        let mut tokens = command.split_whitespace().map(str::to_string);
        let program = tokens.next().ok_or_else(|| {
            FileWatcherError::ConfigError("command must not be empty".to_string())
        })?;

        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    async fn run_inner(&self) -> Result<()> {
        debug!(program = %self.program, args = ?self.args, "starting command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(FileWatcherError::ActionFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        // Captured stdout goes to our stdout verbatim.
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&output.stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

impl ActionRunner for CommandRunner {
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.run_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        let runner = CommandRunner::new("  cargo   test \t--lib ").unwrap();
        assert_eq!(runner.program(), "cargo");
        assert_eq!(runner.args(), ["test", "--lib"]);
    }

    #[test]
    fn blank_command_is_rejected() {
        assert!(matches!(
            CommandRunner::new(" \n "),
            Err(FileWatcherError::ConfigError(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reports_success_and_failure() {
        CommandRunner::new("true").unwrap().run().await.unwrap();

        match CommandRunner::new("false").unwrap().run().await {
            Err(FileWatcherError::ActionFailed { status, .. }) => assert!(!status.success()),
            other => panic!("expected ActionFailed, got {other:?}"),
        }

        let missing = CommandRunner::new("definitely-not-a-real-program-xyz").unwrap();
        assert!(matches!(missing.run().await, Err(FileWatcherError::IoError(_))));
    }
}
