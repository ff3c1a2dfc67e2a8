// Workflow volume PathTranslator adapter
//
// Each service writes under its own local data root; the same tree is mounted
// read-only for the other services of the workflow under the workflow root.

use std::path::Path;
use tracing::warn;

use eo4a_core::domain::VolumeMapping;
use eo4a_core::port::path_translator::{PathError, PathTranslator};

pub struct WorkflowVolume {
    mapping: VolumeMapping,
}

impl WorkflowVolume {
    /// Volume over `mapping`, with a relative local root resolved against the
    /// host's working directory
    pub fn new(mapping: VolumeMapping) -> std::io::Result<Self> {
        let local_root = std::path::absolute(&mapping.local_root)?;
        Ok(Self {
            mapping: VolumeMapping::new(local_root, mapping.workflow_root),
        })
    }
}

impl PathTranslator for WorkflowVolume {
    fn workflow_path(&self, local: &Path) -> Result<String, PathError> {
        if !local.exists() {
            warn!(path = %local.display(), "Result path missing, nothing to publish");
            return Err(PathError::Missing(local.to_path_buf()));
        }
        self.mapping.translate(local)
    }
}
