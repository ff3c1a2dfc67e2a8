// Process Registry - dispatch by identifier

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::ProcessDescriptor;
use crate::error::{AppError, Result};
use crate::port::ProcessDefinition;
use crate::processes::{builtin_processes, BuiltinConfig};

/// Registered processes, keyed by identifier
///
/// Every process is checked once on registration: its descriptor must be free
/// of schema defects and its bindings must only name declared fields.
#[derive(Default, Clone)]
pub struct ProcessRegistry {
    processes: BTreeMap<String, Arc<dyn ProcessDefinition>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in processes
    pub fn with_builtins(config: &BuiltinConfig) -> Result<Self> {
        let mut registry = Self::new();
        for process in builtin_processes(config) {
            registry.register(process)?;
        }
        Ok(registry)
    }

    /// Register a process
    ///
    /// # Errors
    /// - AppError::Domain(SchemaDefect) if the descriptor or bindings are defective
    /// - AppError::Conflict if the identifier is already taken
    pub fn register(&mut self, process: Arc<dyn ProcessDefinition>) -> Result<()> {
        let descriptor = process.describe();
        descriptor.validate()?;
        check_bindings(descriptor, process.as_ref())?;

        let id = descriptor.identifier.clone();
        if self.processes.contains_key(&id) {
            return Err(AppError::Conflict(format!(
                "process '{}' is already registered",
                id
            )));
        }

        info!(
            process = %id,
            inputs = descriptor.inputs.len(),
            outputs = descriptor.outputs.len(),
            "Registered process"
        );
        self.processes.insert(id, process);
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Result<Arc<dyn ProcessDefinition>> {
        self.processes
            .get(identifier)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("process '{}'", identifier)))
    }

    /// Descriptors ordered by identifier
    pub fn descriptors(&self) -> impl Iterator<Item = &ProcessDescriptor> {
        self.processes.values().map(|p| p.describe())
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

fn check_bindings(descriptor: &ProcessDescriptor, process: &dyn ProcessDefinition) -> Result<()> {
    let bindings = process.bindings();
    for name in bindings.inputs {
        if descriptor.input(name).is_none() {
            return Err(descriptor
                .defect(format!("binds undeclared input '{}'", name))
                .into());
        }
    }
    for name in bindings.outputs {
        if descriptor.output(name).is_none() {
            return Err(descriptor
                .defect(format!("binds undeclared output '{}'", name))
                .into());
        }
    }
    Ok(())
}
