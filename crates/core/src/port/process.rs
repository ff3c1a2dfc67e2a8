// Process Definition Port
// Capability contract implemented by every WPS process variant

use crate::domain::{CommandSpec, InvocationContext, ProcessDescriptor, Request, Response};
use crate::error::Result;
use crate::port::{PathTranslator, Workspace};

/// Field names a process reads from requests and writes to responses
///
/// Checked against the descriptor once, when the process is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBindings {
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

/// WPS process variant
///
/// Implementations are shared across concurrent invocations and must not keep
/// per-request state; use the [`InvocationContext`] instead.
pub trait ProcessDefinition: Send + Sync {
    /// Immutable descriptor, built once at construction
    fn describe(&self) -> &ProcessDescriptor;

    fn bindings(&self) -> FieldBindings;

    /// Build the command for a validated request
    ///
    /// # Errors
    /// - DomainError::MissingInput if a required input was not bound
    /// - AppError::Io if a workspace side effect fails
    fn synthesize(
        &self,
        request: &Request,
        ctx: &mut InvocationContext,
        workspace: &dyn Workspace,
    ) -> Result<CommandSpec>;

    /// Populate the response after the command succeeded
    ///
    /// Must leave `response` untouched on error.
    fn map_output(
        &self,
        request: &Request,
        ctx: &InvocationContext,
        response: &mut Response,
        volume: &dyn PathTranslator,
    ) -> Result<()>;

    fn identifier(&self) -> &str {
        &self.describe().identifier
    }
}
