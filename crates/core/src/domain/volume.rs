// Shared Volume Mapping
// Local data volume (private to a service) -> workflow volume (shared, read-only)

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Local path does not exist: {0}")]
    Missing(PathBuf),

    #[error("Path {path} is outside the local data volume {root}")]
    OutsideVolume { path: PathBuf, root: PathBuf },

    #[error("Path {0} escapes its volume through '..'")]
    Escapes(PathBuf),

    #[error("Path is not valid UTF-8: {0}")]
    NotUtf8(PathBuf),
}

/// Translation rule between the two volume roots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMapping {
    pub local_root: PathBuf,
    pub workflow_root: PathBuf,
}

impl VolumeMapping {
    pub const DEFAULT_LOCAL_ROOT: &'static str = "/data_service";
    pub const DEFAULT_WORKFLOW_ROOT: &'static str = "/workflow_data";

    pub fn new(local_root: impl Into<PathBuf>, workflow_root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            workflow_root: workflow_root.into(),
        }
    }

    /// Rewrite `local` onto the workflow root
    ///
    /// Purely lexical: existence is checked by the adapter, not here.
    pub fn translate(&self, local: &Path) -> Result<String, PathError> {
        let relative = local
            .strip_prefix(&self.local_root)
            .map_err(|_| PathError::OutsideVolume {
                path: local.to_path_buf(),
                root: self.local_root.clone(),
            })?;

        let mut shared = self.workflow_root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => shared.push(part),
                Component::CurDir => {}
                _ => return Err(PathError::Escapes(local.to_path_buf())),
            }
        }

        shared
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| PathError::NotUtf8(shared.clone()))
    }
}

impl Default for VolumeMapping {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOCAL_ROOT, Self::DEFAULT_WORKFLOW_ROOT)
    }
}
