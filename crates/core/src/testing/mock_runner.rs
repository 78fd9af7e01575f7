//! Mock command runner for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::runner::{CommandRunner, Invocation, RunError};

/// Mock implementation of the CommandRunner trait.
///
/// Provides controllable behavior for testing:
/// - Record every invocation for assertions
/// - Capture the text of `-i` inputs that exist while running (concat lists,
///   converted ffmetadata files)
/// - Return canned probe output
/// - Simulate a failing exit
#[derive(Debug, Clone)]
pub struct MockRunner {
    /// Recorded invocations, in call order.
    invocations: Arc<RwLock<Vec<Invocation>>>,
    /// Text of readable inputs, keyed by path.
    captured_inputs: Arc<RwLock<HashMap<String, String>>>,
    /// Stdout returned by `output`.
    probe_output: Arc<RwLock<Option<String>>>,
    /// If set, the next call fails with this exit code.
    next_failure: Arc<RwLock<Option<i32>>>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            captured_inputs: Arc::new(RwLock::new(HashMap::new())),
            probe_output: Arc::new(RwLock::new(None)),
            next_failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded invocations.
    pub async fn recorded(&self) -> Vec<Invocation> {
        self.invocations.read().await.clone()
    }

    /// Get the number of invocations performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Clear recorded invocations and captured inputs.
    pub async fn clear_recorded(&self) {
        self.invocations.write().await.clear();
        self.captured_inputs.write().await.clear();
    }

    /// Text of an input file as it was when the invocation ran.
    pub async fn captured_input(&self, path: &str) -> Option<String> {
        self.captured_inputs.read().await.get(path).cloned()
    }

    /// Set the output returned for probe invocations.
    pub async fn set_probe_output(&self, output: impl Into<String>) {
        *self.probe_output.write().await = Some(output.into());
    }

    /// Configure the next call to exit with `code`.
    pub async fn fail_next(&self, code: i32) {
        *self.next_failure.write().await = Some(code);
    }

    async fn record(&self, invocation: &Invocation) -> Result<(), RunError> {
        self.invocations.write().await.push(invocation.clone());

        for pair in invocation.args.windows(2) {
            if pair[0] == "-i" {
                if let Ok(text) = tokio::fs::read_to_string(&pair[1]).await {
                    self.captured_inputs
                        .write()
                        .await
                        .insert(pair[1].clone(), text);
                }
            }
        }

        match self.next_failure.write().await.take() {
            Some(code) => Err(RunError::failed(
                invocation.program.display().to_string(),
                Some(code),
                Some("simulated failure".to_string()),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, invocation: &Invocation) -> Result<(), RunError> {
        self.record(invocation).await
    }

    async fn output(&self, invocation: &Invocation) -> Result<String, RunError> {
        self.record(invocation).await?;
        self.probe_output.read().await.clone().ok_or_else(|| {
            RunError::failed(
                invocation.program.display().to_string(),
                Some(1),
                Some("no probe output configured".to_string()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> Invocation {
        Invocation::new("ffmpeg", vec!["-i".into(), "in.mp3".into(), "out.mp3".into()])
    }

    #[tokio::test]
    async fn test_records_invocations() {
        let runner = MockRunner::new();
        runner.run(&invocation()).await.unwrap();
        runner.run(&invocation()).await.unwrap();

        assert_eq!(runner.invocation_count().await, 2);
        assert_eq!(runner.recorded().await[0].output(), Some("out.mp3"));

        runner.clear_recorded().await;
        assert_eq!(runner.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_fail_next_only_once() {
        let runner = MockRunner::new();
        runner.fail_next(2).await;

        let err = runner.run(&invocation()).await.unwrap_err();
        assert!(matches!(err, RunError::Failed { code: Some(2), .. }));
        assert!(runner.run(&invocation()).await.is_ok());
    }

    #[tokio::test]
    async fn test_output_without_probe_fails() {
        let runner = MockRunner::new();
        assert!(runner.output(&invocation()).await.is_err());

        runner.set_probe_output("{}").await;
        assert_eq!(runner.output(&invocation()).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_captures_readable_inputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let list = dir.path().join("list.txt");
        std::fs::write(&list, "file 'a.mp3'\n").unwrap();
        let path = list.to_string_lossy().to_string();

        let runner = MockRunner::new();
        runner
            .run(&Invocation::new(
                "ffmpeg",
                vec!["-i".into(), path.clone(), "out.mp3".into()],
            ))
            .await
            .unwrap();

        assert_eq!(
            runner.captured_input(&path).await.as_deref(),
            Some("file 'a.mp3'\n")
        );
        assert_eq!(runner.captured_input("in.mp3").await, None);
    }
}
