// Application Layer - Registry, request binding and invocation

pub mod binding;
pub mod registry;
pub mod runner;

// Re-exports
pub use binding::{bind_request, RawInput};
pub use registry::ProcessRegistry;
pub use runner::{InvocationOutcome, InvocationPlan, ProcessRunner, RunnerConfig};
