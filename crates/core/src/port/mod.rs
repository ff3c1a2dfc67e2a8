// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod path_translator;
pub mod process;
pub mod task_executor;
pub mod time_provider;
pub mod workspace;

// Re-exports
pub use id_provider::IdProvider;
pub use path_translator::PathTranslator;
pub use process::{FieldBindings, ProcessDefinition};
pub use task_executor::{ExecutionError, ExecutionResult, ExecutionStatus, TaskExecutor};
pub use time_provider::TimeProvider;
pub use workspace::Workspace;
