//! Process-spawning runner.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};

use super::error::RunError;
use super::traits::{CommandRunner, Invocation};

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Stream the child's stderr to the log as it runs.
    verbose: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs every stderr line at info level instead of debug.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    async fn drain_stderr(&self, stderr: ChildStderr) -> Result<String, RunError> {
        let mut output = String::new();
        let mut lines = BufReader::new(stderr).lines();
        while let Some(line) = lines.next_line().await? {
            if self.verbose {
                tracing::info!("{}", line);
            } else {
                tracing::debug!("{}", line);
            }
            output.push_str(&line);
            output.push('\n');
        }
        Ok(output)
    }

    fn spawn_error(invocation: &Invocation, e: std::io::Error) -> RunError {
        if e.kind() == std::io::ErrorKind::NotFound {
            RunError::ProgramNotFound {
                path: invocation.program.clone(),
            }
        } else {
            RunError::Io(e)
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    fn name(&self) -> &str {
        "system"
    }

    async fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
        tracing::info!(command = %invocation, "Running");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        // Reap the child even when reading its stderr fails.
        let read = match child.stderr.take() {
            Some(stderr) => self.drain_stderr(stderr).await,
            None => Ok(String::new()),
        };
        let status = child.wait().await?;
        let error_output = read?;
        if !status.success() {
            return Err(RunError::failed(
                invocation.program.display().to_string(),
                status.code(),
                if error_output.is_empty() {
                    None
                } else {
                    Some(error_output)
                },
            ));
        }

        Ok(())
    }

    async fn output(&self, invocation: &Invocation) -> Result<String, RunError> {
        tracing::debug!(command = %invocation, "Capturing output");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        if !output.status.success() {
            return Err(RunError::failed(
                invocation.program.display().to_string(),
                output.status.code(),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program() {
        let runner = SystemRunner::new();
        let inv = Invocation::new("/nonexistent/avtools-test-binary", vec![]);
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, RunError::ProgramNotFound { .. }));

        let err = runner.output(&inv).await.unwrap_err();
        assert!(matches!(err, RunError::ProgramNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_exit_reports_code_and_stderr() {
        let runner = SystemRunner::new();
        let inv = Invocation::new(
            "sh",
            vec!["-c".into(), "echo first >&2; echo second >&2; exit 3".into()],
        );
        let err = runner.run(&inv).await.unwrap_err();
        match err {
            RunError::Failed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.as_deref(), Some("first\nsecond\n"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run() {
        let runner = SystemRunner::new().verbose(true);
        let inv = Invocation::new("sh", vec!["-c".into(), "echo ok >&2".into()]);
        assert!(runner.run(&inv).await.is_ok());
    }
}
