// Path Translator Port
// Host-provided mapping from the local data volume to the workflow volume

use std::path::Path;

pub use crate::domain::volume::PathError;

/// Local-to-shared path translation
///
/// Implementations must fail when `local` does not exist; a mapper never
/// publishes a path nobody can read.
#[cfg_attr(test, mockall::automock)]
pub trait PathTranslator: Send + Sync {
    fn workflow_path(&self, local: &Path) -> Result<String, PathError>;
}
