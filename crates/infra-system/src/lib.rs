// EO4A Infrastructure - System Adapters
// Implements: TaskExecutor, Workspace, PathTranslator (ADR-002)

pub mod local_workspace;
pub mod subprocess_executor;
pub mod workflow_volume;

pub use local_workspace::LocalWorkspace;
pub use subprocess_executor::SubprocessExecutor;
pub use workflow_volume::WorkflowVolume;
