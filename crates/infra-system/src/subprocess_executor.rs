// Subprocess executor implementation
// reason: async-trait, tokio for async process management (ADR-001)
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

use eo4a_core::domain::CommandSpec;
use eo4a_core::port::task_executor::{
    ExecutionError, ExecutionResult, ExecutionStatus, TaskExecutor,
};
use eo4a_core::port::TimeProvider;

/// Default environment passed through to child processes (ADR-040)
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &["PATH", "HOME", "USER"];

/// Subprocess executor
/// Spawns child processes with environment allowlisting (ADR-040)
///
/// No timeout and no cancellation: the command runs to completion.
pub struct SubprocessExecutor {
    time_provider: Arc<dyn TimeProvider>,
    env_allowlist: Vec<String>,
}

impl SubprocessExecutor {
    /// Create a new subprocess executor
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `env_allowlist` - Allowed environment variables (security constraint, ADR-040)
    ///
    /// # Example
    /// ```ignore
    /// let executor = SubprocessExecutor::new(
    ///     Arc::new(SystemTimeProvider),
    ///     vec!["PATH".to_string(), "HOME".to_string(), "USER".to_string()],
    /// );
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, env_allowlist: Vec<String>) -> Self {
        Self {
            time_provider,
            env_allowlist,
        }
    }

    /// Filter environment variables to allowlist only (ADR-040)
    fn filter_env(&self, env: &HashMap<String, String>) -> HashMap<String, String> {
        env.iter()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<std::process::Output, ExecutionError> {
        let parent_env: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let filtered_env = self.filter_env(&parent_env);

        let child = Command::new(program)
            .args(args)
            .env_clear()
            .envs(&filtered_env)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", program, e)))?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))
    }

    /// Build execution result from process output
    fn build_result(&self, output: std::process::Output, duration_ms: i64) -> ExecutionResult {
        let status = if output.status.success() {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Failed
        };

        ExecutionResult {
            status,
            exit_code: output.status.code(),
            duration_ms,
            stdout: Some(String::from_utf8_lossy(&output.stdout).to_string()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        }
    }
}

#[async_trait]
impl TaskExecutor for SubprocessExecutor {
    async fn execute(
        &self,
        command: &CommandSpec,
        working_dir: &Path,
    ) -> Result<ExecutionResult, ExecutionError> {
        let (program, args) = command.to_argv();
        let start_time = self.time_provider.now_millis();

        // Display form only: secrets stay out of the logs
        info!(
            command = %command,
            working_dir = %working_dir.display(),
            "Starting subprocess execution"
        );

        let output = self.spawn_and_wait(&program, &args, working_dir).await?;

        let end_time = self.time_provider.now_millis();
        let duration_ms = end_time - start_time;

        let result = self.build_result(output, duration_ms);

        info!(
            program = %program,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            status = ?result.status,
            "Subprocess execution completed"
        );

        Ok(result)
    }
}
