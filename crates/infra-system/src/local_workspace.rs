// Local filesystem Workspace adapter

use std::path::Path;
use tracing::debug;

use eo4a_core::port::Workspace;

/// Workspace backed by the local data volume
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalWorkspace;

impl LocalWorkspace {
    pub fn new() -> Self {
        Self
    }
}

impl Workspace for LocalWorkspace {
    fn ensure_dir(&self, dir: &Path) -> std::io::Result<()> {
        // create_dir_all is a no-op on an existing directory
        std::fs::create_dir_all(dir)?;
        debug!(dir = %dir.display(), "Directory ready");
        Ok(())
    }
}
