//! Host configuration
//!
//! Environment first, overridable by flags. Paths accept `~` and are made
//! absolute against the host's working directory, since commands run in the
//! scripts directory.

use clap::Args;
use std::io;
use std::path::PathBuf;

use eo4a_core::application::RunnerConfig;
use eo4a_core::domain::VolumeMapping;
use eo4a_core::processes::{sentinelsat, BuiltinConfig, SentinelCredentials};
use eo4a_core::AppError;

use crate::logging::LogFormat;

const DEFAULT_DATA_DIR: &str = "/data_service";
const DEFAULT_WORKFLOW_DIR: &str = "/workflow_data";
const DEFAULT_SCRIPTS_DIR: &str = ".";

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Local data volume root (per-invocation output dirs live here)
    #[arg(long, env = "EO4A_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: String,

    /// Workflow volume root, as seen by downstream services
    #[arg(long, env = "EO4A_WORKFLOW_DIR", default_value = DEFAULT_WORKFLOW_DIR, global = true)]
    pub workflow_dir: String,

    /// Directory holding the helper scripts; working dir of every command
    #[arg(long, env = "EO4A_SCRIPTS_DIR", default_value = DEFAULT_SCRIPTS_DIR, global = true)]
    pub scripts_dir: String,

    /// Copernicus hub user for acquisition:sentinelsat
    #[arg(long, env = "SENTINEL_USER", default_value = "", hide_env_values = true, global = true)]
    pub sentinel_user: String,

    /// Copernicus hub password for acquisition:sentinelsat
    #[arg(long, env = "SENTINEL_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    pub sentinel_password: String,

    /// Environment variables passed through to commands
    #[arg(
        long,
        env = "EO4A_ENV_ALLOWLIST",
        value_delimiter = ',',
        default_values = ["PATH", "HOME", "USER"],
        global = true
    )]
    pub env_allowlist: Vec<String>,

    /// Log format on stderr
    #[arg(long, env = "EO4A_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Also write JSON logs to daily files in this directory
    #[arg(long, env = "EO4A_LOG_DIR", global = true)]
    pub log_dir: Option<String>,
}

impl Settings {
    pub fn data_root(&self) -> io::Result<PathBuf> {
        resolve(&self.data_dir)
    }

    pub fn log_dir(&self) -> io::Result<Option<PathBuf>> {
        self.log_dir.as_deref().map(resolve).transpose()
    }

    /// The workflow root names a mount in other services and is kept verbatim
    pub fn volume_mapping(&self) -> io::Result<VolumeMapping> {
        Ok(VolumeMapping::new(
            self.data_root()?,
            shellexpand::tilde(&self.workflow_dir).into_owned(),
        ))
    }

    pub fn runner_config(&self) -> io::Result<RunnerConfig> {
        Ok(RunnerConfig {
            data_root: self.data_root()?,
            scripts_dir: resolve(&self.scripts_dir)?,
        })
    }

    pub fn builtin_config(&self) -> BuiltinConfig {
        BuiltinConfig {
            sentinel: SentinelCredentials::new(&self.sentinel_user, &self.sentinel_password),
        }
    }

    pub fn has_sentinel_credentials(&self) -> bool {
        !self.sentinel_user.is_empty() && !self.sentinel_password.is_empty()
    }

    /// Refuse to run a process whose configuration is incomplete
    ///
    /// # Errors
    /// - AppError::Config if `acquisition:sentinelsat` has no hub credentials
    pub fn check_runnable(&self, process: &str) -> eo4a_core::Result<()> {
        if process == sentinelsat::IDENTIFIER && !self.has_sentinel_credentials() {
            return Err(AppError::Config(
                "SENTINEL_USER and SENTINEL_PASSWORD are required for acquisition:sentinelsat"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve(path: &str) -> io::Result<PathBuf> {
    std::path::absolute(&*shellexpand::tilde(path))
}
