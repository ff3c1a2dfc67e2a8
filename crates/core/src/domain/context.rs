// Invocation Context
// Request-scoped state threaded from command synthesis to output mapping

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::error::{DomainError, Result};

/// Invocation ID (UUID v4)
pub type InvocationId = String;

/// Per-request state
///
/// Descriptors are shared and must stay stateless; anything the synthesizer
/// computes for the mapper goes here.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationContext {
    pub invocation_id: InvocationId,
    /// Per-request directory on the local data volume
    pub output_dir: PathBuf,
    result_dir: Option<PathBuf>,
}

impl InvocationContext {
    pub fn new(invocation_id: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            output_dir: output_dir.into(),
            result_dir: None,
        }
    }

    /// Record the directory the command will write its results to
    pub fn set_result_dir(&mut self, dir: PathBuf) {
        self.result_dir = Some(dir);
    }

    pub fn result_dir(&self) -> Result<&Path> {
        self.result_dir.as_deref().ok_or_else(|| {
            DomainError::InvalidState(format!(
                "no result directory recorded for invocation {}",
                self.invocation_id
            ))
        })
    }
}
