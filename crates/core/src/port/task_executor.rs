// Task Executor Port (ADR-002)
// Abstraction for running a synthesized command as an external process

use crate::domain::CommandSpec;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Result of task execution
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub duration_ms: i64,
    pub exit_code: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

/// Execution status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Success,
    Failed,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Command '{command}' exited with code {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Task Executor trait
///
/// Implementations:
/// - SubprocessExecutor: spawns external process
/// - MockTaskExecutor: canned results for tests
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Run `command` in `working_dir` and wait for it to finish
    ///
    /// A non-zero exit is reported through `ExecutionStatus::Failed`, not as an
    /// error; callers decide how fatal it is.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if process cannot be started
    /// - ExecutionError::IoError if waiting on the process fails
    async fn execute(
        &self,
        command: &CommandSpec,
        working_dir: &Path,
    ) -> Result<ExecutionResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Exit with the given code
        Exit(i32),
        /// Fail to spawn with message
        Fail(String),
    }

    /// Mock Task Executor for testing
    pub struct MockTaskExecutor {
        behavior: Arc<Mutex<MockBehavior>>,
        commands: Arc<Mutex<Vec<CommandSpec>>>,
    }

    impl MockTaskExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                commands: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_exit(code: i32) -> Self {
            Self::new(MockBehavior::Exit(code))
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn call_count(&self) -> usize {
            self.commands.lock().unwrap().len()
        }

        /// Commands received so far, in call order
        pub fn commands(&self) -> Vec<CommandSpec> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskExecutor for MockTaskExecutor {
        async fn execute(
            &self,
            command: &CommandSpec,
            _working_dir: &Path,
        ) -> Result<ExecutionResult, ExecutionError> {
            self.commands.lock().unwrap().push(command.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success => Ok(ExecutionResult {
                    status: ExecutionStatus::Success,
                    duration_ms: 100,
                    exit_code: Some(0),
                    stdout: Some("mock output".to_string()),
                    stderr: None,
                }),
                MockBehavior::Exit(code) => Ok(ExecutionResult {
                    status: ExecutionStatus::Failed,
                    duration_ms: 100,
                    exit_code: Some(code),
                    stdout: None,
                    stderr: Some("mock failure".to_string()),
                }),
                MockBehavior::Fail(msg) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }
    }
}
