// Built-in WPS processes

pub mod gdalwarp_ref;
pub mod input_demos;
pub mod sentinelsat;
pub mod sleep;

pub use gdalwarp_ref::GdalWarpRef;
pub use input_demos::InputDemos;
pub use sentinelsat::SentinelDownload;
pub use sleep::Sleep;

use crate::port::ProcessDefinition;
use std::sync::Arc;

/// Copernicus hub account used by the sentinel downloader
#[derive(Clone, Default)]
pub struct SentinelCredentials {
    pub user: String,
    pub password: String,
}

impl SentinelCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for SentinelCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentinelCredentials")
            .field("user", &self.user)
            .field("password", &"******")
            .finish()
    }
}

/// Settings the built-in processes need at construction
#[derive(Debug, Clone, Default)]
pub struct BuiltinConfig {
    pub sentinel: SentinelCredentials,
}

/// All built-in processes, ready to register
pub fn builtin_processes(config: &BuiltinConfig) -> Vec<Arc<dyn ProcessDefinition>> {
    vec![
        Arc::new(SentinelDownload::new(config.sentinel.clone())),
        Arc::new(GdalWarpRef::new()),
        Arc::new(Sleep::new()),
        Arc::new(InputDemos::new()),
    ]
}

pub(crate) fn sample_metadata(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}
