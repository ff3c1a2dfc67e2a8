// Response Domain Model

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::error::{DomainError, Result};
use crate::domain::schema::{ProcessDescriptor, Uom};

/// Value written into a declared output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputValue {
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<Uom>,
}

/// Response under construction for one invocation
///
/// Only outputs declared by the owning descriptor can be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    process: String,
    #[serde(skip)]
    declared: HashSet<String>,
    outputs: BTreeMap<String, OutputValue>,
}

impl Response {
    pub fn for_descriptor(descriptor: &ProcessDescriptor) -> Self {
        Self {
            process: descriptor.identifier.clone(),
            declared: descriptor.outputs.iter().map(|o| o.name.clone()).collect(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn process(&self) -> &str {
        &self.process
    }

    pub fn set(&mut self, name: &str, data: impl Into<String>, uom: Option<Uom>) -> Result<()> {
        if !self.declared.contains(name) {
            return Err(DomainError::UndeclaredOutput(name.to_string()));
        }
        self.outputs.insert(
            name.to_string(),
            OutputValue {
                data: data.into(),
                uom,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.outputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
