// Process Runner - one request through synthesize -> execute -> map

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::application::registry::ProcessRegistry;
use crate::domain::{CommandSpec, InvocationContext, InvocationId, Request, Response};
use crate::error::Result;
use crate::port::{
    ExecutionError, ExecutionResult, ExecutionStatus, IdProvider, PathTranslator,
    ProcessDefinition, TaskExecutor, TimeProvider, Workspace,
};

/// Lines of stderr kept in a non-zero exit error
const STDERR_TAIL_LINES: usize = 20;

/// Where invocations write and where their tools live
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Root of the local data volume; each invocation gets `<data_root>/<id>`
    ///
    /// A relative root is resolved against the host's working directory, never
    /// against `scripts_dir`.
    pub data_root: PathBuf,
    /// Working directory of spawned commands (holds the helper scripts)
    pub scripts_dir: PathBuf,
}

/// Synthesized but not executed invocation
#[derive(Debug, Clone, Serialize)]
pub struct InvocationPlan {
    pub process: String,
    pub context: InvocationContext,
    pub command: CommandSpec,
}

/// Successful invocation
#[derive(Debug, Clone, Serialize)]
pub struct InvocationOutcome {
    pub invocation_id: InvocationId,
    pub process: String,
    /// Command as displayed, secrets masked
    pub command: String,
    pub execution: ExecutionResult,
    pub response: Response,
    pub started_at: i64,
    pub finished_at: i64,
}

/// Drives registered processes for the host
///
/// Holds no per-request state; concurrent `run` calls are independent.
pub struct ProcessRunner {
    registry: Arc<ProcessRegistry>,
    task_executor: Arc<dyn TaskExecutor>,
    workspace: Arc<dyn Workspace>,
    volume: Arc<dyn PathTranslator>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    config: RunnerConfig,
}

impl ProcessRunner {
    pub fn new(
        registry: Arc<ProcessRegistry>,
        task_executor: Arc<dyn TaskExecutor>,
        workspace: Arc<dyn Workspace>,
        volume: Arc<dyn PathTranslator>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            registry,
            task_executor,
            workspace,
            volume,
            id_provider,
            time_provider,
            config,
        }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Synthesize the command without running it (dry run)
    ///
    /// Nothing is created on disk: directories the process would provision are
    /// only named in the plan.
    pub fn plan(&self, identifier: &str, request: &Request) -> Result<InvocationPlan> {
        let process = self.registry.get(identifier)?;
        self.prepare(process.as_ref(), request, &DryRunWorkspace)
    }

    /// Run a request end-to-end
    ///
    /// The response is only returned when every step succeeded; a failed
    /// command or output mapping discards it.
    ///
    /// # Errors
    /// - AppError::NotFound if no process has this identifier
    /// - AppError::Execution on spawn failure or non-zero exit
    /// - AppError::Path / AppError::Domain if output mapping fails
    pub async fn run(&self, identifier: &str, request: &Request) -> Result<InvocationOutcome> {
        let process = self.registry.get(identifier)?;
        let started_at = self.time_provider.now_millis();

        let plan = self.prepare(process.as_ref(), request, self.workspace.as_ref())?;
        let invocation_id = plan.context.invocation_id.clone();

        info!(
            invocation_id = %invocation_id,
            process = %identifier,
            command = %plan.command,
            "Starting invocation"
        );

        let execution = self
            .task_executor
            .execute(&plan.command, &self.config.scripts_dir)
            .await
            .inspect_err(|e| {
                error!(invocation_id = %invocation_id, error = %e, "Command could not be run")
            })?;

        if execution.status != ExecutionStatus::Success {
            error!(
                invocation_id = %invocation_id,
                exit_code = ?execution.exit_code,
                "Command failed"
            );
            return Err(ExecutionError::NonZeroExit {
                command: plan.command.to_string(),
                code: execution.exit_code,
                stderr: tail_lines(execution.stderr.as_deref().unwrap_or_default()),
            }
            .into());
        }

        let mut response = Response::for_descriptor(process.describe());
        process
            .map_output(request, &plan.context, &mut response, self.volume.as_ref())
            .inspect_err(|e| {
                error!(invocation_id = %invocation_id, error = %e, "Output mapping failed")
            })?;

        let finished_at = self.time_provider.now_millis();
        info!(
            invocation_id = %invocation_id,
            process = %identifier,
            duration_ms = execution.duration_ms,
            "Invocation completed"
        );

        Ok(InvocationOutcome {
            invocation_id,
            process: identifier.to_string(),
            command: plan.command.to_string(),
            execution,
            response,
            started_at,
            finished_at,
        })
    }

    fn prepare(
        &self,
        process: &dyn ProcessDefinition,
        request: &Request,
        workspace: &dyn Workspace,
    ) -> Result<InvocationPlan> {
        let invocation_id = self.id_provider.generate_id();
        // Commands run in scripts_dir, so they must only ever see absolute paths
        let output_dir = std::path::absolute(&self.config.data_root)?.join(&invocation_id);
        workspace.ensure_dir(&output_dir)?;

        let mut context = InvocationContext::new(invocation_id, output_dir);
        let command = process.synthesize(request, &mut context, workspace)?;

        debug!(
            invocation_id = %context.invocation_id,
            output_dir = %context.output_dir.display(),
            command = %command,
            "Synthesized command"
        );

        Ok(InvocationPlan {
            process: process.identifier().to_string(),
            context,
            command,
        })
    }
}

/// Stands in for the real workspace during dry runs
struct DryRunWorkspace;

impl Workspace for DryRunWorkspace {
    fn ensure_dir(&self, dir: &Path) -> std::io::Result<()> {
        debug!(dir = %dir.display(), "Dry run, directory not created");
        Ok(())
    }
}

fn tail_lines(text: &str) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
