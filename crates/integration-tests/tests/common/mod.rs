//! Shared harness: real executor, workspace and volume over a temp directory

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eo4a_core::application::{ProcessRegistry, ProcessRunner, RunnerConfig};
use eo4a_core::domain::VolumeMapping;
use eo4a_core::port::id_provider::SequentialIdProvider;
use eo4a_core::port::time_provider::SystemTimeProvider;
use eo4a_core::processes::{BuiltinConfig, SentinelCredentials};
use eo4a_infra_system::{LocalWorkspace, SubprocessExecutor, WorkflowVolume};

pub const WORKFLOW_ROOT: &str = "/workflow_data";

/// Stand-in for the real raster script: records its input dir in the output dir
pub const GDALWARP_SCRIPT: &str = r#"#!/bin/bash
set -e
mkdir -p "$2"
echo "warped $1" > "$2/manifest.txt"
"#;

/// Stand-in for the real sleep script: reports instead of sleeping
pub const SLEEP_SCRIPT: &str = r#"#!/bin/bash
echo "slept $1"
"#;

pub struct Harness {
    _root: tempfile::TempDir,
    _relative_data: Option<tempfile::TempDir>,
    pub data_root: PathBuf,
    pub scripts_dir: PathBuf,
    pub runner: ProcessRunner,
}

impl Harness {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let data_root = root.path().join("data_service");
        Self::build(root, None, data_root)
    }

    /// Data root given relative to the test's working directory, as with a
    /// relative EO4A_DATA_DIR; scripts still live in a separate temp directory
    pub fn with_relative_data_root() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let relative = tempfile::Builder::new()
            .prefix("data_service")
            .tempdir_in(".")
            .expect("relative tempdir");
        let data_root = PathBuf::from(relative.path().file_name().unwrap());
        Self::build(root, Some(relative), data_root)
    }

    fn build(
        root: tempfile::TempDir,
        relative_data: Option<tempfile::TempDir>,
        data_root: PathBuf,
    ) -> Self {
        let scripts_dir = root.path().join("scripts");
        std::fs::create_dir_all(&data_root).unwrap();
        std::fs::create_dir_all(&scripts_dir).unwrap();

        write_script(&scripts_dir, "gdalwarp_script.sh", GDALWARP_SCRIPT);
        write_script(&scripts_dir, "sleep_script.sh", SLEEP_SCRIPT);

        let config = BuiltinConfig {
            sentinel: SentinelCredentials::new("hub-user", "hub-secret"),
        };
        let registry = ProcessRegistry::with_builtins(&config).expect("builtins register");

        let time_provider = Arc::new(SystemTimeProvider);
        let runner = ProcessRunner::new(
            Arc::new(registry),
            Arc::new(SubprocessExecutor::new(
                time_provider.clone(),
                vec!["PATH".to_string(), "HOME".to_string()],
            )),
            Arc::new(LocalWorkspace::new()),
            Arc::new(
                WorkflowVolume::new(VolumeMapping::new(&data_root, WORKFLOW_ROOT))
                    .expect("workflow volume"),
            ),
            Arc::new(SequentialIdProvider::default()),
            time_provider,
            RunnerConfig {
                data_root: data_root.clone(),
                scripts_dir: scripts_dir.clone(),
            },
        );

        Self {
            _root: root,
            _relative_data: relative_data,
            data_root,
            scripts_dir,
            runner,
        }
    }

    /// Replace a helper script, e.g. with a failing one
    pub fn script(&self, name: &str, body: &str) {
        write_script(&self.scripts_dir, name, body);
    }

    /// Write a GeoJSON polygon next to the scripts dir and return its path
    pub fn geojson(&self) -> PathBuf {
        let path = self.scripts_dir.parent().unwrap().join("region.geojson");
        std::fs::write(
            &path,
            r#"{"type":"Polygon","coordinates":[[[10,50],[11,50],[11,51],[10,50]]]}"#,
        )
        .unwrap();
        path
    }
}

fn write_script(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}
