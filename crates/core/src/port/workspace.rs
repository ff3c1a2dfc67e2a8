// Workspace Port
// Filesystem side effects a command synthesizer may need before running

use std::path::Path;

pub trait Workspace: Send + Sync {
    /// Create `dir` and its parents; succeeds if it already exists
    fn ensure_dir(&self, dir: &Path) -> std::io::Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records requested directories without touching the filesystem
    #[derive(Default)]
    pub struct RecordingWorkspace {
        created: Mutex<Vec<PathBuf>>,
    }

    impl RecordingWorkspace {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn created(&self) -> Vec<PathBuf> {
            self.created.lock().unwrap().clone()
        }
    }

    impl Workspace for RecordingWorkspace {
        fn ensure_dir(&self, dir: &Path) -> std::io::Result<()> {
            self.created.lock().unwrap().push(dir.to_path_buf());
            Ok(())
        }
    }
}
